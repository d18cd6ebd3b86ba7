//! OSC 1.0 packet codec.
//!
//! Wraps `rosc` behind a typed argument enum so the rest of the system
//! never handles wire types directly. AbletonOSC only uses int32, float32,
//! string, blob, and the tag-only booleans; any other inbound argument
//! type rejects the whole packet. Bundles are decoded and flattened in
//! arrival order; we only ever emit plain messages.

use rosc::{decoder, encoder, OscBundle, OscPacket, OscType};

use crate::OscError;

/// One OSC argument, limited to the types the remote script speaks.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Int(i32),
    Float(f32),
    Str(String),
    Blob(Vec<u8>),
    Bool(bool),
}

impl OscArg {
    /// Integer value, if this argument is an int.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            OscArg::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float value; ints widen, matching how the remote script answers
    /// float queries with whole numbers.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            OscArg::Float(f) => Some(*f),
            OscArg::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    /// Boolean value; 0/1 ints count, since the remote script uses both
    /// encodings depending on the property.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OscArg::Bool(b) => Some(*b),
            OscArg::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscArg::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i32> for OscArg {
    fn from(v: i32) -> Self {
        OscArg::Int(v)
    }
}

impl From<f32> for OscArg {
    fn from(v: f32) -> Self {
        OscArg::Float(v)
    }
}

impl From<&str> for OscArg {
    fn from(v: &str) -> Self {
        OscArg::Str(v.to_string())
    }
}

impl From<String> for OscArg {
    fn from(v: String) -> Self {
        OscArg::Str(v)
    }
}

impl From<bool> for OscArg {
    fn from(v: bool) -> Self {
        OscArg::Bool(v)
    }
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub addr: String,
    pub args: Vec<OscArg>,
}

/// A decoded inbound packet: a single message or a flattened bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Message(OscMessage),
    Bundle(Vec<OscMessage>),
}

impl Inbound {
    /// Messages in arrival order, regardless of packaging.
    pub fn into_messages(self) -> Vec<OscMessage> {
        match self {
            Inbound::Message(m) => vec![m],
            Inbound::Bundle(msgs) => msgs,
        }
    }
}

fn to_wire(arg: &OscArg) -> OscType {
    match arg {
        OscArg::Int(i) => OscType::Int(*i),
        OscArg::Float(f) => OscType::Float(*f),
        OscArg::Str(s) => OscType::String(s.clone()),
        OscArg::Blob(b) => OscType::Blob(b.clone()),
        OscArg::Bool(b) => OscType::Bool(*b),
    }
}

fn from_wire(arg: OscType) -> Result<OscArg, OscError> {
    match arg {
        OscType::Int(i) => Ok(OscArg::Int(i)),
        OscType::Float(f) => Ok(OscArg::Float(f)),
        OscType::String(s) => Ok(OscArg::Str(s)),
        OscType::Blob(b) => Ok(OscArg::Blob(b)),
        OscType::Bool(b) => Ok(OscArg::Bool(b)),
        other => Err(OscError::MalformedPacket(format!(
            "unsupported argument type {other:?}"
        ))),
    }
}

/// Encode a single OSC message.
pub fn encode(addr: &str, args: &[OscArg]) -> Result<Vec<u8>, OscError> {
    if !addr.starts_with('/') || addr.contains(char::is_whitespace) {
        return Err(OscError::BadArgument(format!("invalid OSC address {addr:?}")));
    }
    let packet = OscPacket::Message(rosc::OscMessage {
        addr: addr.to_string(),
        args: args.iter().map(to_wire).collect(),
    });
    encoder::encode(&packet).map_err(|e| OscError::BadArgument(e.to_string()))
}

/// Decode one UDP datagram. Truncated, mis-padded, or unsupported content
/// rejects the entire packet so garbage can never half-consume the socket.
pub fn decode(buf: &[u8]) -> Result<Inbound, OscError> {
    let (_rest, packet) =
        decoder::decode_udp(buf).map_err(|e| OscError::MalformedPacket(e.to_string()))?;
    match packet {
        OscPacket::Message(msg) => Ok(Inbound::Message(convert_message(msg)?)),
        OscPacket::Bundle(bundle) => {
            let mut messages = Vec::new();
            flatten_bundle(bundle, &mut messages)?;
            Ok(Inbound::Bundle(messages))
        }
    }
}

fn convert_message(msg: rosc::OscMessage) -> Result<OscMessage, OscError> {
    let args = msg
        .args
        .into_iter()
        .map(from_wire)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(OscMessage { addr: msg.addr, args })
}

fn flatten_bundle(bundle: OscBundle, out: &mut Vec<OscMessage>) -> Result<(), OscError> {
    for element in bundle.content {
        match element {
            OscPacket::Message(msg) => out.push(convert_message(msg)?),
            OscPacket::Bundle(inner) => flatten_bundle(inner, out)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roundtrip_all_supported_types() {
        let args = vec![
            OscArg::Int(42),
            OscArg::Float(1.5),
            OscArg::Str("Bass".into()),
            OscArg::Blob(vec![0, 1, 2, 3]),
            OscArg::Bool(true),
            OscArg::Bool(false),
        ];
        let bytes = encode("/song/get/tempo", &args).unwrap();
        let decoded = decode(&bytes).unwrap();

        assert_eq!(
            decoded,
            Inbound::Message(OscMessage { addr: "/song/get/tempo".into(), args })
        );
    }

    #[test]
    fn roundtrip_empty_args() {
        let bytes = encode("/test", &[]).unwrap();
        let messages = decode(&bytes).unwrap().into_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].addr, "/test");
        assert!(messages[0].args.is_empty());
    }

    #[test]
    fn rejects_bad_address() {
        assert!(matches!(encode("no_slash", &[]), Err(OscError::BadArgument(_))));
        assert!(matches!(encode("/has space", &[]), Err(OscError::BadArgument(_))));
    }

    #[test]
    fn rejects_truncated_packet() {
        let bytes = encode("/clip/fire", &[OscArg::Int(0), OscArg::Int(1)]).unwrap();
        let err = decode(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, OscError::MalformedPacket(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode(b"not osc at all"), Err(OscError::MalformedPacket(_))));
    }

    #[test]
    fn rejects_unsupported_argument_type_wholesale() {
        // A double ('d') is valid OSC but outside the supported tag set;
        // the whole packet must be rejected, not partially decoded.
        let packet = OscPacket::Message(rosc::OscMessage {
            addr: "/song/get/tempo".into(),
            args: vec![OscType::Int(1), OscType::Double(1.0)],
        });
        let bytes = encoder::encode(&packet).unwrap();
        assert!(matches!(decode(&bytes), Err(OscError::MalformedPacket(_))));
    }

    #[test]
    fn decodes_bundles_in_order() {
        let bundle = OscPacket::Bundle(OscBundle {
            timetag: rosc::OscTime { seconds: 0, fractional: 1 },
            content: vec![
                OscPacket::Message(rosc::OscMessage {
                    addr: "/a".into(),
                    args: vec![OscType::Int(1)],
                }),
                OscPacket::Message(rosc::OscMessage {
                    addr: "/b".into(),
                    args: vec![OscType::Int(2)],
                }),
            ],
        });
        let bytes = encoder::encode(&bundle).unwrap();

        let messages = decode(&bytes).unwrap().into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].addr, "/a");
        assert_eq!(messages[1].addr, "/b");
    }

    #[test]
    fn float_coercion_from_int() {
        assert_eq!(OscArg::Int(120).as_float(), Some(120.0));
        assert_eq!(OscArg::Str("x".into()).as_float(), None);
    }

    #[test]
    fn bool_coercion_from_int() {
        assert_eq!(OscArg::Int(1).as_bool(), Some(true));
        assert_eq!(OscArg::Int(0).as_bool(), Some(false));
        assert_eq!(OscArg::Bool(true).as_bool(), Some(true));
        assert_eq!(OscArg::Float(1.0).as_bool(), None);
    }
}
