//! PIX "copia e cola" payloads (BR Code, EMV merchant-presented mode).
use crate::aggregate::round_for_display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const GUI: &str = "br.gov.bcb.pix";
const MAX_NAME_LEN: usize = 25;
const MAX_CITY_LEN: usize = 15;
/// Longest key that keeps the merchant account template (`26`) within the
/// two-digit TLV length: 99 minus the GUI entry (18) and the key header (4).
pub const MAX_KEY_LEN: usize = 77;

/// Payee details baked into every PIX charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixConfig {
    pub key: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub txid: String,
}

impl Default for PixConfig {
    fn default() -> Self {
        Self {
            key: "pagamentos@vitrine.com.br".to_string(),
            merchant_name: "VITRINE".to_string(),
            merchant_city: "SAO PAULO".to_string(),
            txid: "***".to_string(),
        }
    }
}

impl PixConfig {
    /// Check the key fits in a BR Code merchant account template.
    ///
    /// # Errors
    ///
    /// Returns the offending length when the key is empty or too long.
    pub fn validate(&self) -> Result<(), usize> {
        let len = self.key.len();
        if len == 0 || len > MAX_KEY_LEN {
            return Err(len);
        }
        Ok(())
    }
}

/// Turns an amount plus payee into the string a QR renderer draws.
pub trait QrPayloadEncoder {
    fn encode(&self, amount: Decimal, config: &PixConfig) -> String;
}

/// Static BR Code encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrCodeEncoder;

impl QrPayloadEncoder for BrCodeEncoder {
    fn encode(&self, amount: Decimal, config: &PixConfig) -> String {
        let account = [tlv("00", GUI), tlv("01", &config.key)].concat();
        let mut payload = String::new();
        payload.push_str(&tlv("00", "01"));
        payload.push_str(&tlv("26", &account));
        payload.push_str(&tlv("52", "0000"));
        payload.push_str(&tlv("53", "986"));
        if amount > Decimal::ZERO {
            payload.push_str(&tlv("54", &round_for_display(amount).to_string()));
        }
        payload.push_str(&tlv("58", "BR"));
        payload.push_str(&tlv("59", &sanitize(&config.merchant_name, MAX_NAME_LEN)));
        payload.push_str(&tlv("60", &sanitize(&config.merchant_city, MAX_CITY_LEN)));
        payload.push_str(&tlv("62", &tlv("05", &sanitize(&config.txid, 25))));
        payload.push_str("6304");
        let crc = crc16_ccitt(payload.as_bytes());
        payload.push_str(&format!("{crc:04X}"));
        payload
    }
}

/// A charge ready to be shown next to the payment options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixCharge {
    pub amount: Decimal,
    pub key: String,
    pub payload: String,
}

impl PixCharge {
    #[must_use]
    pub fn new(amount: Decimal, config: &PixConfig, encoder: &impl QrPayloadEncoder) -> Self {
        Self {
            amount,
            key: config.key.clone(),
            payload: encoder.encode(amount, config),
        }
    }
}

fn tlv(id: &str, value: &str) -> String {
    format!("{id}{:02}{value}", value.len())
}

/// BR Code fields are plain ASCII; anything else is dropped.
fn sanitize(value: &str, max_len: usize) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .take(max_len)
        .collect()
}

/// CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF).
#[must_use]
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 == 0 {
                crc << 1
            } else {
                (crc << 1) ^ 0x1021
            };
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_matches_reference_vector() {
        assert_eq!(crc16_ccitt(b"123456789"), 0x29B1);
    }

    #[test]
    fn payload_carries_amount_key_and_checksum() {
        let config = PixConfig::default();
        let payload = BrCodeEncoder.encode("29.97".parse().unwrap(), &config);
        assert!(payload.starts_with("000201"));
        assert!(payload.contains("0014br.gov.bcb.pix"));
        assert!(payload.contains("0125pagamentos@vitrine.com.br"));
        assert!(payload.contains("540529.97"));
        assert!(payload.contains("5802BR"));

        let (body, crc) = payload.split_at(payload.len() - 4);
        assert!(body.ends_with("6304"));
        assert_eq!(crc, format!("{:04X}", crc16_ccitt(body.as_bytes())));
    }

    #[test]
    fn key_length_is_bounded_by_the_account_template() {
        let longest = PixConfig {
            key: "k".repeat(MAX_KEY_LEN),
            ..PixConfig::default()
        };
        assert_eq!(longest.validate(), Ok(()));
        let payload = BrCodeEncoder.encode(Decimal::ONE, &longest);
        assert!(payload.contains(&format!("2699{}", tlv("00", GUI))));

        let too_long = PixConfig {
            key: "k".repeat(MAX_KEY_LEN + 1),
            ..PixConfig::default()
        };
        assert_eq!(too_long.validate(), Err(MAX_KEY_LEN + 1));
        let blank = PixConfig {
            key: String::new(),
            ..PixConfig::default()
        };
        assert_eq!(blank.validate(), Err(0));
    }

    #[test]
    fn zero_amount_is_left_open() {
        let payload = BrCodeEncoder.encode(Decimal::ZERO, &PixConfig::default());
        assert!(!payload.contains("5303986540"));
    }

    #[test]
    fn merchant_fields_are_trimmed_to_ascii_limits() {
        let config = PixConfig {
            merchant_name: "Loja de Presentes Açaí e Companhia".into(),
            merchant_city: "São José dos Campos".into(),
            ..PixConfig::default()
        };
        let payload = BrCodeEncoder.encode(Decimal::ONE, &config);
        assert!(payload.contains("5925Loja de Presentes Aa e Co"));
        assert!(payload.contains("6015So Jos dos Camp"));
    }
}
