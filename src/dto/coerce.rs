use serde::{Deserialize, Deserializer, de};

// Form clients send numbers either as JSON numbers or as text ("10", " 25 ");
// accept both and reject anything non-numeric at the boundary.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormNumber {
    Int(i64),
    Text(String),
}

fn parse_text<'de, D>(text: &str) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    text.parse::<i64>().map_err(|_| {
        de::Error::invalid_value(de::Unexpected::Str(text), &"an integer or a numeric string")
    })
}

pub fn form_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match FormNumber::deserialize(deserializer)? {
        FormNumber::Int(value) => Ok(value),
        FormNumber::Text(text) => parse_text::<D>(text.trim()),
    }
}

pub fn form_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = form_i64(deserializer)?;
    i32::try_from(value).map_err(|_| de::Error::custom("integer out of range"))
}

// Absent fields and blank strings become None instead of an error.
pub fn form_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FormNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FormNumber::Int(value)) => Ok(Some(value)),
        Some(FormNumber::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                parse_text::<D>(text).map(Some)
            }
        }
    }
}

pub fn form_opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match form_opt_i64(deserializer)? {
        None => Ok(None),
        Some(value) => i32::try_from(value)
            .map(Some)
            .map_err(|_| de::Error::custom("integer out of range")),
    }
}
