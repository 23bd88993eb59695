use phf::phf_set;

/// Suffixes accepted as a plausible top-level domain.
const RECOGNIZED_TLDS: phf::Set<&'static str> = phf_set! {
    ".com", ".net", ".org", ".edu", ".gov", ".co", ".io", ".dev",
    ".info", ".biz", ".mx", ".es", ".app", ".xyz",
};

/// True when `domain` ends with a recognised suffix and at least one character
/// precedes it.
///
/// Candidate suffixes are taken at every `.` from the left, so the longest one
/// is always tested before any shorter suffix it contains.
pub fn is_valid_tld(domain: &str) -> bool {
    domain
        .match_indices('.')
        .map(|(idx, _)| idx)
        .any(|idx| idx > 0 && RECOGNIZED_TLDS.contains(&domain[idx..]))
}
