//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come from the institute config (classes) or from the fixed
//! value sets of the domain enums, so what the user picks always parses.

use crate::{
    bot::BotData,
    core::{
        attendance_status::{AttendanceStatus, COMMENT_OPTIONS, PersonKind},
        term_status::{PaymentMethod, TermStatus},
    },
    errors::Error,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

fn filter_options<'a>(options: impl IntoIterator<Item = &'a str>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    options
        .into_iter()
        .filter(|option| option.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Provides autocomplete suggestions for class names.
///
/// Classes are read from the `classes` list in config.toml, in the order they
/// are configured.
pub async fn autocomplete_class(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let classes = &ctx.data().config.classes;
    filter_options(classes.iter().map(String::as_str), partial)
}

/// Provides autocomplete suggestions for payment methods.
pub async fn autocomplete_payment_method(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_options(PaymentMethod::ALL.iter().map(|m| m.as_str()), partial)
}

/// Provides autocomplete suggestions for fee statuses.
pub async fn autocomplete_fee_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let statuses = [TermStatus::Pending, TermStatus::Paid, TermStatus::Overdue];
    filter_options(statuses.iter().map(|s| s.as_str()), partial)
}

/// Provides autocomplete suggestions for attendance statuses.
pub async fn autocomplete_attendance_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_options(
        AttendanceStatus::SELECTABLE.iter().map(|s| s.as_str()),
        partial,
    )
}

/// Provides autocomplete suggestions for whose attendance is being marked.
pub async fn autocomplete_person_kind(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let kinds = [PersonKind::Student, PersonKind::Teacher];
    filter_options(kinds.iter().map(|k| k.as_str()), partial)
}

/// Provides autocomplete suggestions for half-day and leave comments.
///
/// Late arrivals take a check-in time instead, which is typed freely.
pub async fn autocomplete_attendance_comment(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_options(COMMENT_OPTIONS, partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_options_is_case_insensitive() {
        let matches = filter_options(COMMENT_OPTIONS, "leave");
        assert_eq!(matches, vec!["Sick Leave", "Casual Leave"]);
    }

    #[test]
    fn test_filter_options_empty_partial_returns_all() {
        let matches = filter_options(PaymentMethod::ALL.iter().map(|m| m.as_str()), "");
        assert_eq!(matches, vec!["Cash", "Cheque", "Online", "Card"]);
    }

    #[test]
    fn test_filter_options_caps_suggestions() {
        let many: Vec<String> = (0..40).map(|i| format!("Class {i}")).collect();
        let matches = filter_options(many.iter().map(String::as_str), "class");
        assert_eq!(matches.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_selectable_statuses_parse_back() {
        for suggestion in filter_options(
            AttendanceStatus::SELECTABLE.iter().map(|s| s.as_str()),
            "",
        ) {
            assert!(suggestion.parse::<AttendanceStatus>().is_ok());
        }
    }
}
