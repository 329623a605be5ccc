use crate::domain::payment::PaymentRequest;
use crate::error::Result;
use std::io::Read;

/// Reads a single `PaymentRequest` from a JSON source.
pub struct RequestReader<R: Read> {
    source: R,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g. File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Deserializes the request. Amount validation happens here, so a request
    /// with a non-positive amount never reaches the controller.
    pub fn read_request(self) -> Result<PaymentRequest> {
        Ok(serde_json::from_reader(self.source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_request() {
        let data = r#"{"amount": "100", "courseId": "c1", "courseTitle": "Rust", "orderId": "order_1"}"#;
        let request = RequestReader::new(data.as_bytes()).read_request().unwrap();

        assert_eq!(request.amount.value(), dec!(100));
        assert_eq!(request.order_id.as_deref(), Some("order_1"));
    }

    #[test]
    fn test_reader_rejects_negative_amount() {
        let data = r#"{"amount": -5, "courseId": "c1", "courseTitle": "Rust"}"#;
        let result = RequestReader::new(data.as_bytes()).read_request();

        assert!(matches!(result, Err(CheckoutError::SerializationError(_))));
    }

    #[test]
    fn test_reader_malformed_json() {
        let result = RequestReader::new("{not json".as_bytes()).read_request();
        assert!(result.is_err());
    }
}
