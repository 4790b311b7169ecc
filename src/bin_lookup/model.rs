//! BIN lookup request and response JSON.
//!
//! Every field is optional. Absent fields deserialize to `None` and `None`
//! fields are left out when serializing, so a round trip never introduces
//! defaults.

use crate::error::BinLookupError;
use serde::{Deserialize, Serialize};

/// Request body of a BIN lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinLookupRequest {
    /// The card number prefix, encrypted with the merchant public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_bin: Option<String>,

    /// Unique identifier of this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// `txVariant`s accepted by the merchant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_brands: Option<Vec<String>>,

    /// Card type filter, e.g. `"debit"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
}

impl BinLookupRequest {
    /// Serializes the request to a JSON string.
    pub fn to_json(&self) -> Result<String, BinLookupError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a request from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, BinLookupError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One brand entry in a BIN lookup response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandResponse {
    /// `txVariant` of the brand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_luhn_check: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported: Option<bool>,

    /// `required`, `optional` or `hidden`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvc_policy: Option<String>,

    /// `required`, `optional` or `hidden`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_variant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_brand: Option<String>,
}

/// Response body of a BIN lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinLookupResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<BrandResponse>>,

    /// ISO 3166-1 alpha-2 country code of the issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_country_code: Option<String>,

    /// Echo of the request identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl BinLookupResponse {
    /// Serializes the response to a JSON string.
    pub fn to_json(&self) -> Result<String, BinLookupError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a response from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, BinLookupError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names() {
        let request = BinLookupRequest {
            encrypted_bin: Some("eyJhbGc".into()),
            request_id: Some("f0c8a4b2".into()),
            supported_brands: Some(vec!["visa".into(), "mc".into()]),
            card_type: Some("debit".into()),
        };
        let json: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(json["encryptedBin"], "eyJhbGc");
        assert_eq!(json["requestId"], "f0c8a4b2");
        assert_eq!(json["supportedBrands"][1], "mc");
        assert_eq!(json["type"], "debit");
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        assert_eq!(BinLookupRequest::default().to_json().unwrap(), "{}");
        let response = BinLookupResponse {
            request_id: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(response.to_json().unwrap(), r#"{"requestId":"abc"}"#);
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "brands": [
                {
                    "brand": "bcmc",
                    "enableLuhnCheck": true,
                    "supported": true,
                    "cvcPolicy": "hidden",
                    "expiryDatePolicy": "required",
                    "panLength": 17,
                    "localizedBrand": "Bancontact"
                },
                { "brand": "maestro" }
            ],
            "issuingCountryCode": "BE",
            "requestId": "1234"
        }"#;
        let response = BinLookupResponse::from_json(json).unwrap();
        let brands = response.brands.unwrap();
        assert_eq!(brands.len(), 2);
        assert_eq!(brands[0].cvc_policy.as_deref(), Some("hidden"));
        assert_eq!(brands[0].pan_length, Some(17));
        assert_eq!(brands[0].localized_brand.as_deref(), Some("Bancontact"));
        assert_eq!(brands[1].enable_luhn_check, None);
        assert_eq!(brands[1].supported, None);
        assert_eq!(response.issuing_country_code.as_deref(), Some("BE"));
    }

    #[test]
    fn test_request_round_trip() {
        let requests = [
            BinLookupRequest {
                encrypted_bin: Some("eyJhbGc".into()),
                request_id: Some("f0c8a4b2".into()),
                supported_brands: Some(vec!["visa".into(), "bcmc".into()]),
                card_type: Some("debit".into()),
            },
            BinLookupRequest {
                request_id: Some("f0c8a4b2".into()),
                supported_brands: Some(vec![]),
                ..Default::default()
            },
            BinLookupRequest::default(),
        ];
        for request in requests {
            let parsed = BinLookupRequest::from_json(&request.to_json().unwrap()).unwrap();
            assert_eq!(parsed, request);
        }
    }

    #[test]
    fn test_response_round_trip() {
        let full_brand = BrandResponse {
            brand: Some("bcmc".into()),
            enable_luhn_check: Some(true),
            supported: Some(false),
            cvc_policy: Some("hidden".into()),
            expiry_date_policy: Some("optional".into()),
            pan_length: Some(17),
            payment_method_variant: Some("bcmc_debit".into()),
            localized_brand: Some("Bancontact".into()),
        };
        let sparse_brand = BrandResponse {
            brand: Some("maestro".into()),
            ..Default::default()
        };
        let responses = [
            BinLookupResponse {
                brands: Some(vec![full_brand, sparse_brand, BrandResponse::default()]),
                issuing_country_code: Some("BE".into()),
                request_id: Some("1234".into()),
            },
            BinLookupResponse {
                brands: Some(vec![]),
                ..Default::default()
            },
            BinLookupResponse::default(),
        ];
        for response in responses {
            let parsed = BinLookupResponse::from_json(&response.to_json().unwrap()).unwrap();
            assert_eq!(parsed, response);
        }
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let response = BinLookupResponse::from_json(r#"{"somethingNew": 1}"#).unwrap();
        assert_eq!(response, BinLookupResponse::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            BinLookupResponse::from_json("{\"brands\": ["),
            Err(BinLookupError::Serialization(_))
        ));
        assert!(matches!(
            BinLookupRequest::from_json("42"),
            Err(BinLookupError::Serialization(_))
        ));
    }
}
