//! Address grammar and canonical form for submitter emails.

use validator::ValidateEmail;

const MAX_ADDRESS_LEN: usize = 254;

/// Providers that ignore dots and `+tag` suffixes in the local part.
const GMAIL_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];

/// Validates and canonicalizes an address. Returns `None` when the grammar does
/// not match, before or after alias folding.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if !is_valid(trimmed) {
        return None;
    }
    Some(canonicalize(trimmed)).filter(|canonical| is_valid(canonical))
}

/// RFC grammar via [`ValidateEmail`], narrowed to dot-atom local parts and
/// public-looking domains.
pub fn is_valid(address: &str) -> bool {
    if address.len() > MAX_ADDRESS_LEN || !address.validate_email() {
        return false;
    }
    let Some((local, domain)) = address.rsplit_once('@') else {
        return false;
    };
    dot_atom(local) && public_domain(domain)
}

fn dot_atom(local: &str) -> bool {
    !local.starts_with('.') && !local.ends_with('.') && !local.contains("..")
}

/// At least two ASCII labels and an alphabetic or punycode TLD. Rejects bare
/// hosts and IP literals.
fn public_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2
        || !labels
            .iter()
            .all(|l| !l.is_empty() && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
    {
        return false;
    }
    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && (tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"))
}

/// Lowercases the address and folds Gmail aliases onto one mailbox.
pub fn canonicalize(address: &str) -> String {
    let lowered = address.trim().to_lowercase();
    let Some((local, domain)) = lowered.rsplit_once('@') else {
        return lowered;
    };
    if GMAIL_DOMAINS.contains(&domain) {
        let base = local.split('+').next().unwrap_or(local);
        let base: String = base.chars().filter(|c| *c != '.').collect();
        return format!("{base}@gmail.com");
    }
    lowered
}
