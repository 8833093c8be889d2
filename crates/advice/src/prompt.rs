use model::{Age, Profile, format_currency};

const INTRODUCTION: &str =
    "You are a financial advisor helping someone understand their financial situation.";

const INSTRUCTIONS: &str = "Provide personalized financial advice covering:
1. Retirement planning assessment
2. Investment allocation feedback
3. Emergency fund adequacy
4. Any specific recommendations based on their situation

Keep the advice clear, actionable, and educational.";

/// User message for the chat completion request.
pub fn build_advice_prompt(profile: &Profile) -> String {
    let kids_line = profile
        .kids_ages()
        .map(|kids_ages| format!("- Kids' ages: {kids_ages}\n"))
        .unwrap_or_default();

    format!(
        "{INTRODUCTION}

Profile:
- Age: {age}
- Target retirement age: {retirement_age}
- Annual income: {income}
- Cash/emergency savings: {cash_savings}
- Brokerage/stocks/ETFs: {investments}
- Retirement accounts (401k, IRA, etc.): {retirement_accounts}
{kids_line}
{INSTRUCTIONS}",
        age = age_or_na(profile.age),
        retirement_age = age_or_na(profile.target_retirement_age),
        income = format_currency(&profile.income),
        cash_savings = format_currency(&profile.cash_savings),
        investments = format_currency(&profile.investments),
        retirement_accounts = format_currency(&profile.retirement_accounts),
    )
}

fn age_or_na(age: Option<Age>) -> String {
    age.map(|a| a.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
