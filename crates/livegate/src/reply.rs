//! Reply argument coercion.
//!
//! AbletonOSC getters echo the addressed object's indices ahead of the
//! value: `/track/get/name 3` answers `[3, "Bass"]`. Each typed getter
//! knows its echo width. Replies that omit the echo (value only) are
//! tolerated, since both layouts exist in the wild; anything else is a
//! protocol error and the raw arguments are logged verbatim.

use liveosc::OscArg;
use tracing::warn;

use crate::GatewayError;

/// The value argument of a scalar reply with `echo` leading index args.
fn scalar<'a>(args: &'a [OscArg], echo: usize, addr: &str) -> Result<&'a OscArg, GatewayError> {
    if let Some(value) = args.get(echo) {
        return Ok(value);
    }
    if args.len() == 1 {
        return Ok(&args[0]);
    }
    warn!(addr, ?args, "reply has no value argument");
    Err(GatewayError::Protocol(format!("{addr}: reply {args:?} has no value argument")))
}

pub fn float(args: &[OscArg], echo: usize, addr: &str) -> Result<f32, GatewayError> {
    scalar(args, echo, addr)?.as_float().ok_or_else(|| type_error(args, addr, "float"))
}

pub fn int(args: &[OscArg], echo: usize, addr: &str) -> Result<i32, GatewayError> {
    scalar(args, echo, addr)?.as_int().ok_or_else(|| type_error(args, addr, "int"))
}

pub fn boolean(args: &[OscArg], echo: usize, addr: &str) -> Result<bool, GatewayError> {
    scalar(args, echo, addr)?.as_bool().ok_or_else(|| type_error(args, addr, "bool"))
}

pub fn string(args: &[OscArg], echo: usize, addr: &str) -> Result<String, GatewayError> {
    scalar(args, echo, addr)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| type_error(args, addr, "string"))
}

/// The argument tail after the echoed indices. Used by flat list replies
/// (notes, device parameters): when the remainder is not a whole number of
/// records, the echo is assumed absent and the full list is used.
pub fn tail<'a>(args: &'a [OscArg], echo: usize, record: usize) -> &'a [OscArg] {
    if args.len() >= echo && (args.len() - echo) % record == 0 {
        &args[echo..]
    } else if args.len() % record == 0 {
        args
    } else {
        &args[echo.min(args.len())..]
    }
}

fn type_error(args: &[OscArg], addr: &str, wanted: &str) -> GatewayError {
    warn!(addr, ?args, wanted, "reply value has unexpected type");
    GatewayError::Protocol(format!("{addr}: expected a {wanted} in reply {args:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn value_after_echo() {
        let args = vec![OscArg::Int(3), OscArg::Str("Bass".into())];
        assert_eq!(string(&args, 1, "/track/get/name").unwrap(), "Bass");
    }

    #[test]
    fn value_without_echo_is_tolerated() {
        let args = vec![OscArg::Str("Bass".into())];
        assert_eq!(string(&args, 1, "/track/get/name").unwrap(), "Bass");
    }

    #[test]
    fn int_widens_to_float() {
        let args = vec![OscArg::Int(120)];
        assert_eq!(float(&args, 0, "/song/get/tempo").unwrap(), 120.0);
    }

    #[test]
    fn zero_one_coerces_to_bool() {
        assert!(boolean(&[OscArg::Int(1)], 0, "/song/get/metronome").unwrap());
        assert!(!boolean(&[OscArg::Bool(false)], 0, "/song/get/metronome").unwrap());
    }

    #[test]
    fn wrong_type_is_a_protocol_error() {
        let err = int(&[OscArg::Str("x".into())], 0, "/song/get/num_tracks").unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[test]
    fn missing_value_is_a_protocol_error() {
        let args = vec![OscArg::Int(0), OscArg::Int(1)];
        let err = string(&args, 2, "/clip/get/name").unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[test]
    fn tail_skips_echo_when_records_align() {
        // [track, scene] + one 5-field note record
        let args: Vec<OscArg> = vec![
            OscArg::Int(0),
            OscArg::Int(0),
            OscArg::Int(60),
            OscArg::Float(0.0),
            OscArg::Float(1.0),
            OscArg::Int(100),
            OscArg::Bool(false),
        ];
        assert_eq!(tail(&args, 2, 5).len(), 5);

        // No echo: the whole reply is records
        let bare = &args[2..];
        assert_eq!(tail(bare, 2, 5).len(), 5);
    }
}
