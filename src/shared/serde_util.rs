//! Custom serde helpers for backend wire formats.

/// Deserializes a `Decimal` from either a JSON string (`"1000.00"`) or a JSON
/// number (`1000`, `12.5`).
///
/// The backend renders decimal fields as strings, but point values and prices
/// edited through the admin screens come back as plain numbers.
pub mod decimal_lenient {
    use rust_decimal::Decimal;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;
    use std::str::FromStr;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientVisitor)
    }

    struct LenientVisitor;

    impl<'de> Visitor<'de> for LenientVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal as a string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(Decimal::ZERO);
            }
            Decimal::from_str(trimmed)
                .map_err(|e| E::custom(format!("Invalid decimal {:?}: {}", v, e)))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Decimal::try_from(v).map_err(|e| E::custom(format!("Invalid decimal {}: {}", v, e)))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }
    }
}

/// Like [`decimal_lenient`], but `null` or a missing field becomes `None`.
pub mod decimal_lenient_opt {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super::decimal_lenient")] Decimal);

        let opt = Option::<Wrapper>::deserialize(deserializer)?;
        Ok(opt.map(|Wrapper(d)| d))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use std::str::FromStr;

    #[derive(Deserialize)]
    struct Priced {
        #[serde(with = "super::decimal_lenient")]
        price: Decimal,
        #[serde(default, with = "super::decimal_lenient_opt")]
        original_price: Option<Decimal>,
    }

    #[test]
    fn test_decimal_from_string() {
        let p: Priced = serde_json::from_str(r#"{"price": "1000.50"}"#).unwrap();
        assert_eq!(p.price, Decimal::from_str("1000.50").unwrap());
        assert_eq!(p.original_price, None);
    }

    #[test]
    fn test_decimal_from_number() {
        let p: Priced = serde_json::from_str(r#"{"price": 150, "original_price": "1200"}"#).unwrap();
        assert_eq!(p.price, Decimal::from(150));
        assert_eq!(p.original_price, Some(Decimal::from(1200)));
    }

    #[test]
    fn test_decimal_null_and_empty_are_zero() {
        let p: Priced = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(p.price, Decimal::ZERO);
        let p: Priced = serde_json::from_str(r#"{"price": ""}"#).unwrap();
        assert_eq!(p.price, Decimal::ZERO);
    }

    #[test]
    fn test_decimal_garbage_rejected() {
        let res: Result<Priced, _> = serde_json::from_str(r#"{"price": "abc"}"#);
        assert!(res.is_err());
    }
}
