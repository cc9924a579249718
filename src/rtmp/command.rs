// RTMP command parsing

use crate::amf::{
    amf0_decode_null, amf0_decode_number, amf0_decode_object_key, amf0_decode_string,
    AMF0Value, AMFDecodingCursor, AmfDecodeError, AMF0_TYPE_NULL, AMF0_TYPE_OBJECT, AMF0_TYPE_STRING,
    AMF0_TYPE_UNDEFINED,
};

use super::CommandError;

/// Command object of connect
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RtmpConnectCommand {
    pub trans_id: f64,
    pub app: String,
    pub connection_type: String,
    pub flashver: String,
    pub swf_url: String,
    pub tc_url: String,
    pub fpad: bool,
    pub audio_codecs: f64,
    pub video_codecs: f64,
    pub video_function: f64,
    pub page_url: String,
}

/// Decoded RTMP command
#[derive(Debug, Clone, PartialEq)]
pub enum RtmpCommand {
    Connect(RtmpConnectCommand),
    CreateStream {
        trans_id: f64,
    },
    Publish {
        trans_id: f64,
        name: String,
        publish_type: String,
    },
    Play {
        trans_id: f64,
        name: String,
    },
    DeleteStream {
        trans_id: f64,
        stream_id: f64,
    },
}

impl RtmpCommand {
    /// Decodes a command from the payload of an AMF0 command message
    ///
    /// # Arguments
    ///
    /// * `payload` - Message payload
    ///
    /// # Return value
    ///
    /// Returns the command, or an error. Unsupported command names
    /// produce CommandError::UnknownCommand.
    pub fn decode(payload: &[u8]) -> Result<RtmpCommand, CommandError> {
        let mut cursor = AMFDecodingCursor::new(payload);

        let name = amf0_decode_string(&mut cursor)?;

        match name.as_str() {
            "connect" => Ok(RtmpCommand::Connect(decode_connect(&mut cursor)?)),
            "createStream" => Ok(RtmpCommand::CreateStream {
                trans_id: amf0_decode_number(&mut cursor)?,
            }),
            "publish" => {
                let trans_id = amf0_decode_number(&mut cursor)?;
                amf0_decode_null(&mut cursor)?;
                let name = amf0_decode_string(&mut cursor)?;

                let publish_type = if !cursor.ended() && cursor.look_byte()? == AMF0_TYPE_STRING
                {
                    amf0_decode_string(&mut cursor)?
                } else {
                    "live".to_string()
                };

                Ok(RtmpCommand::Publish {
                    trans_id,
                    name,
                    publish_type,
                })
            }
            "play" => {
                let trans_id = amf0_decode_number(&mut cursor)?;
                amf0_decode_null(&mut cursor)?;

                // Start, duration and reset are ignored
                Ok(RtmpCommand::Play {
                    trans_id,
                    name: amf0_decode_string(&mut cursor)?,
                })
            }
            "deleteStream" => {
                let trans_id = amf0_decode_number(&mut cursor)?;
                amf0_decode_null(&mut cursor)?;

                Ok(RtmpCommand::DeleteStream {
                    trans_id,
                    stream_id: amf0_decode_number(&mut cursor)?,
                })
            }
            _ => Err(CommandError::UnknownCommand(name)),
        }
    }
}

/// Decodes the arguments of connect
fn decode_connect(cursor: &mut AMFDecodingCursor) -> Result<RtmpConnectCommand, CommandError> {
    let mut cmd = RtmpConnectCommand {
        trans_id: amf0_decode_number(cursor)?,
        ..RtmpConnectCommand::default()
    };

    if cursor.ended() {
        return Ok(cmd);
    }

    match cursor.look_byte()? {
        AMF0_TYPE_OBJECT => cursor.skip(1)?,
        AMF0_TYPE_NULL | AMF0_TYPE_UNDEFINED => return Ok(cmd),
        found => {
            return Err(CommandError::Amf(AmfDecodeError::UnexpectedMarker {
                expected: AMF0_TYPE_OBJECT,
                found,
            }))
        }
    }

    while let Some(key) = amf0_decode_object_key(cursor)? {
        // Nulls are accepted for any key and leave the default
        match cursor.look_byte()? {
            AMF0_TYPE_NULL | AMF0_TYPE_UNDEFINED => {
                cursor.skip(1)?;
                continue;
            }
            _ => {}
        }

        let value = AMF0Value::read(cursor)?;

        match (key.as_str(), value) {
            ("app", AMF0Value::String(s)) => cmd.app = s,
            ("type", AMF0Value::String(s)) => cmd.connection_type = s,
            ("flashVer", AMF0Value::String(s)) | ("flashver", AMF0Value::String(s)) => {
                cmd.flashver = s
            }
            ("swfUrl", AMF0Value::String(s)) => cmd.swf_url = s,
            ("tcUrl", AMF0Value::String(s)) => cmd.tc_url = s,
            ("fpad", AMF0Value::Bool(b)) => cmd.fpad = b,
            ("audioCodecs", AMF0Value::Number(n)) => cmd.audio_codecs = n,
            ("videoCodecs", AMF0Value::Number(n)) => cmd.video_codecs = n,
            ("videoFunction", AMF0Value::Number(n)) => cmd.video_function = n,
            ("pageUrl", AMF0Value::String(s)) => cmd.page_url = s,
            _ => {}
        }
    }

    Ok(cmd)
}

// Tests
