//! Case-insensitive keyword matching over free text.

/// Return the keywords that occur in `text`, in the order they were given.
///
/// Matching is plain substring containment against the lower-cased text;
/// keywords are expected to be lower-case already. An empty result means
/// the text is not relevant.
///
/// # Arguments
///
/// * `text` - Free text to search, in any case
/// * `keywords` - Lower-case keywords, in priority order
///
/// # Returns
///
/// The subsequence of `keywords` found in `text`.
pub fn match_keywords(text: &str, keywords: &[String]) -> Vec<String> {
    let haystack = text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| !kw.is_empty() && haystack.contains(kw.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_matches_case_insensitively() {
        assert_eq!(
            match_keywords("Senior fMRI Researcher", &kw(&["fmri", "brain"])),
            kw(&["fmri"])
        );
    }

    #[test]
    fn test_empty_keywords_never_match() {
        assert!(match_keywords("Senior fMRI Researcher", &[]).is_empty());
    }

    #[test]
    fn test_preserves_keyword_order() {
        let text = "Brain imaging with MRI and fMRI";
        assert_eq!(
            match_keywords(text, &kw(&["mri", "brain", "eeg", "fmri"])),
            kw(&["mri", "brain", "fmri"])
        );
    }

    #[test]
    fn test_substring_not_token() {
        // "mri" is contained in "fmri"; no tokenization is applied.
        assert_eq!(match_keywords("fMRI lab", &kw(&["mri"])), kw(&["mri"]));
    }
}
