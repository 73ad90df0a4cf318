use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealCountResponse {
    pub meals_quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietCountResponse {
    pub count_meals: i64,
    pub in_diet: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSequencyResponse {
    pub best_sequency: u32,
}

/// `inDiet` stays a string here so only the literals `true`/`false` are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietQuery {
    pub in_diet: String,
}

impl DietQuery {
    pub fn flag(&self) -> Option<bool> {
        match self.in_diet.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_literals_are_flags() {
        let q = |s: &str| DietQuery { in_diet: s.into() }.flag();
        assert_eq!(q("true"), Some(true));
        assert_eq!(q("false"), Some(false));
        assert_eq!(q("TRUE"), None);
        assert_eq!(q("1"), None);
        assert_eq!(q(""), None);
    }
}
