//! Response framing for the dispatch loop.

use std::io::Write;

use gstd_types::Response;
use gstd_types::framing::RESPONSE_SENTINEL;

use super::errors::DispatchError;

/// Writes response envelopes followed by the sentinel byte.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps an output stream.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `response` as pretty JSON, the sentinel, and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub fn write_response(&mut self, response: &Response) -> Result<(), DispatchError> {
        serde_json::to_writer_pretty(&mut self.writer, response)?;
        self.writer.write_all(&[RESPONSE_SENTINEL])?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes the failure response for `error`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_error(&mut self, error: &DispatchError) -> Result<(), DispatchError> {
        self.write_response(&Response::failure(error.return_code(), &error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use gstd_types::ReturnCode;
    use serde_json::json;

    use super::*;

    #[test]
    fn terminates_pretty_json_with_sentinel() {
        let mut output = Vec::new();
        let mut writer = ResponseWriter::new(&mut output);
        writer
            .write_response(&Response::success(json!("playing")))
            .expect("write response");

        assert_eq!(output.last(), Some(&RESPONSE_SENTINEL));
        let body = std::str::from_utf8(&output[..output.len() - 1]).expect("utf8 body");
        assert!(body.contains("\n  \"code\": 0,"));
        let decoded: Response = serde_json::from_str(body).expect("body decodes");
        assert_eq!(decoded.response, json!("playing"));
    }

    #[test]
    fn write_error_carries_code_and_detail() {
        let mut output = Vec::new();
        let mut writer = ResponseWriter::new(&mut output);
        let error = DispatchError::UnknownCommand {
            verb: "fly".to_owned(),
        };
        writer.write_error(&error).expect("write error");

        let body = std::str::from_utf8(&output[..output.len() - 1]).expect("utf8 body");
        let decoded: Response = serde_json::from_str(body).expect("body decodes");
        assert_eq!(decoded.code, ReturnCode::BadCommand);
        assert!(decoded.description.contains("unknown command 'fly'"));
    }
}
