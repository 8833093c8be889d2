use std::fmt;

use serde::Deserialize;

use crate::format::safe_number;

/// Age in whole years, in range `[0, 120]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u8);

impl Age {
    pub const MAX: u8 = 120;

    pub fn new(years: u8) -> Option<Self> {
        if years <= Self::MAX {
            Some(Self(years))
        } else {
            None
        }
    }

    pub fn years(&self) -> u8 {
        self.0
    }

    /// Coerce number input text the way the form's number widget does.
    ///
    /// Empty or non-numeric text is `None`. Numbers are truncated to whole
    /// years and clamped into the allowed range.
    pub fn from_form_input(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let years = match text.parse::<i64>() {
            Ok(years) => years,
            Err(_) => {
                let value = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
                value.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64
            }
        };

        let years = years.clamp(0, Self::MAX.into());
        u8::try_from(years).ok().and_then(Self::new)
    }
}

impl TryFrom<u8> for Age {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("Age {} is larger than {}", value, Self::MAX))
    }
}

impl From<Age> for u8 {
    fn from(value: Age) -> Self {
        value.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User's self reported financial snapshot.
///
/// Money fields keep the text the user typed. Use [`Profile::amount`] or
/// [`crate::format_currency`] to read them as numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub age: Option<Age>,
    pub target_retirement_age: Option<Age>,
    pub income: String,
    pub cash_savings: String,
    pub investments: String,
    pub retirement_accounts: String,
    /// Comma separated ages, for example `"8, 15"`.
    pub kids_ages: String,
}

impl Profile {
    /// Dashboard can be shown only when age and income are filled.
    pub fn has_dashboard_fields(&self) -> bool {
        self.age.is_some() && !self.income.trim().is_empty()
    }

    /// Money field as a non-negative number.
    pub fn amount(value: &str) -> f64 {
        safe_number(value).max(0.0)
    }

    /// Brokerage holdings plus retirement account holdings.
    pub fn total_investable(&self) -> f64 {
        Self::amount(&self.investments) + Self::amount(&self.retirement_accounts)
    }

    pub fn kids_ages(&self) -> Option<&str> {
        let kids_ages = self.kids_ages.trim();
        if kids_ages.is_empty() {
            None
        } else {
            Some(kids_ages)
        }
    }
}

/// Profile form as posted by the browser.
///
/// Missing fields are empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub age: String,
    pub target_retirement_age: String,
    pub income: String,
    pub cash_savings: String,
    pub investments: String,
    pub retirement_accounts: String,
    pub kids_ages: String,
}

impl ProfileForm {
    pub fn into_profile(self) -> Profile {
        Profile {
            age: Age::from_form_input(&self.age),
            target_retirement_age: Age::from_form_input(&self.target_retirement_age),
            income: self.income.trim().to_string(),
            cash_savings: self.cash_savings.trim().to_string(),
            investments: self.investments.trim().to_string(),
            retirement_accounts: self.retirement_accounts.trim().to_string(),
            kids_ages: self.kids_ages.trim().to_string(),
        }
    }
}

/// Per session profile storage.
///
/// Writes replace the whole profile. There is no merging of fields.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profile: Profile,
}

impl ProfileStore {
    pub fn get(&self) -> &Profile {
        &self.profile
    }

    pub fn set(&mut self, profile: Profile) {
        self.profile = profile;
    }

    pub fn reset(&mut self) {
        self.profile = Profile::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_profile() -> Profile {
        Profile {
            age: Age::new(30),
            target_retirement_age: Age::new(65),
            income: "100000".to_string(),
            cash_savings: "10000".to_string(),
            investments: "50000".to_string(),
            retirement_accounts: "20000".to_string(),
            kids_ages: String::new(),
        }
    }

    #[test]
    fn age_is_bounded() {
        assert_eq!(Age::new(0).map(|a| a.years()), Some(0));
        assert_eq!(Age::new(120).map(|a| a.years()), Some(120));
        assert!(Age::new(121).is_none());
        assert!(Age::try_from(200).is_err());
    }

    #[test]
    fn age_form_input_is_coerced() {
        assert_eq!(Age::from_form_input(""), None);
        assert_eq!(Age::from_form_input("abc"), None);
        assert_eq!(Age::from_form_input(" 42 "), Age::new(42));
        assert_eq!(Age::from_form_input("42.9"), Age::new(42));
        assert_eq!(Age::from_form_input("-3"), Age::new(0));
        assert_eq!(Age::from_form_input("500"), Age::new(120));
        assert_eq!(Age::from_form_input("99999999999999999999"), Age::new(120));
    }

    #[test]
    fn default_profile_is_empty() {
        let profile = Profile::default();
        assert!(profile.age.is_none());
        assert!(profile.target_retirement_age.is_none());
        assert!(profile.income.is_empty());
        assert!(profile.kids_ages().is_none());
        assert!(!profile.has_dashboard_fields());
    }

    #[test]
    fn dashboard_needs_age_and_income() {
        let mut profile = example_profile();
        assert!(profile.has_dashboard_fields());

        profile.income = "  ".to_string();
        assert!(!profile.has_dashboard_fields());

        let mut profile = example_profile();
        profile.age = None;
        assert!(!profile.has_dashboard_fields());
    }

    #[test]
    fn total_investable_sums_investments_and_retirement() {
        assert_eq!(example_profile().total_investable(), 70000.0);

        let mut profile = example_profile();
        profile.investments = "not a number".to_string();
        profile.retirement_accounts = "-500".to_string();
        assert_eq!(profile.total_investable(), 0.0);
    }

    #[test]
    fn form_is_converted_to_profile() {
        let form = ProfileForm {
            age: "30".to_string(),
            target_retirement_age: "65".to_string(),
            income: " 100000 ".to_string(),
            cash_savings: "10000".to_string(),
            investments: "50000".to_string(),
            retirement_accounts: "20000".to_string(),
            kids_ages: "".to_string(),
        };
        assert_eq!(form.into_profile(), example_profile());
    }

    #[test]
    fn form_fields_default_to_empty() {
        let form: ProfileForm = serde_json::from_str(r#"{"income": "5"}"#).unwrap();
        let profile = form.into_profile();
        assert_eq!(profile.income, "5");
        assert!(profile.age.is_none());
        assert!(profile.cash_savings.is_empty());
    }

    #[test]
    fn store_set_then_get_returns_same_profile() {
        let mut store = ProfileStore::default();
        store.set(example_profile());
        assert_eq!(store.get(), &example_profile());
    }

    #[test]
    fn store_set_replaces_every_field() {
        let mut store = ProfileStore::default();
        store.set(example_profile());
        let replacement = Profile {
            income: "1".to_string(),
            ..Profile::default()
        };
        store.set(replacement.clone());
        assert_eq!(store.get(), &replacement);
        assert!(store.get().age.is_none());
    }

    #[test]
    fn store_reset_restores_defaults() {
        let mut store = ProfileStore::default();
        store.set(example_profile());
        store.reset();
        assert_eq!(store.get(), &Profile::default());
    }
}
