/// Capitalises the first letter of each space-separated word and lowercases the rest.
pub fn to_title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compact count for badges: 155700 -> "155.7K", 2000000 -> "2M".
pub fn format_number(num: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

    for (value, suffix) in UNITS {
        if num >= value {
            let scaled = format!("{:.1}", num as f64 / value as f64);
            let trimmed = scaled.strip_suffix(".0").unwrap_or(&scaled);
            return format!("{}{}", trimmed, suffix);
        }
    }

    num.to_string()
}

/// First value of a possibly repeated query parameter, or empty.
pub fn normalize_param<S: AsRef<str>>(values: &[S]) -> String {
    values
        .first()
        .map(|value| value.as_ref().to_string())
        .unwrap_or_default()
}
