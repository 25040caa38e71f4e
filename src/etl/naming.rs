/// Lower-cases a header and replaces every space with an underscore.
///
/// Only spaces are rewritten; other punctuation passes through untouched so
/// that passthrough columns keep recognisable names.
pub fn standardise_header(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

pub fn standardise_headers<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().map(standardise_header).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardise_header() {
        assert_eq!(standardise_header("Credit Score"), "credit_score");
        assert_eq!(standardise_header("PAST_ACCIDENTS"), "past_accidents");
        assert_eq!(standardise_header("Vehicle  Type"), "vehicle__type");
        assert_eq!(standardise_header("id"), "id");
    }
}
