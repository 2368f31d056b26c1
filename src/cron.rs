//! Syntax check for standard five-field cron expressions.
//!
//! Fields are minute, hour, day-of-month, month and day-of-week. Only
//! numeric forms are accepted: `*`, `n`, `a-b`, any of those with a
//! `/step` suffix, and comma separated lists of them.

struct FieldRange {
    min: u32,
    max: u32,
}

const FIELDS: [FieldRange; 5] = [
    FieldRange { min: 0, max: 59 },
    FieldRange { min: 0, max: 23 },
    FieldRange { min: 1, max: 31 },
    FieldRange { min: 1, max: 12 },
    FieldRange { min: 0, max: 6 },
];

pub fn is_valid_cron(expression: &str) -> bool {
    let parts: Vec<&str> = expression.split_whitespace().collect();
    if parts.len() != FIELDS.len() {
        return false;
    }

    parts
        .iter()
        .zip(FIELDS.iter())
        .all(|(part, range)| is_valid_field(part, range))
}

fn is_valid_field(field: &str, range: &FieldRange) -> bool {
    field.split(',').all(|item| is_valid_item(item, range))
}

fn is_valid_item(item: &str, range: &FieldRange) -> bool {
    let (base, step) = match item.split_once('/') {
        Some((base, step)) => (base, Some(step)),
        None => (item, None),
    };

    if let Some(step) = step {
        match parse_number(step) {
            Some(step) if step >= 1 && step <= range.max => {}
            _ => return false,
        }
    }

    if base == "*" {
        return true;
    }

    match base.split_once('-') {
        Some((start, end)) => match (parse_number(start), parse_number(end)) {
            (Some(start), Some(end)) => in_range(start, range) && in_range(end, range) && start <= end,
            _ => false,
        },
        None => parse_number(base).is_some_and(|n| in_range(n, range)),
    }
}

fn parse_number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn in_range(value: u32, range: &FieldRange) -> bool {
    value >= range.min && value <= range.max
}
