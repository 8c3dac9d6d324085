//! Referral tokens and the per-waitlist referral graph.
//!
//! Every signup carries a short opaque `referral_id`. Another signup that
//! joined through that link stores the token in `referred_by`. The token is
//! not a foreign key: a `referred_by` value may point at nothing, and that
//! resolves to "no referrer" rather than an error.

use std::collections::HashMap;

use indexmap::IndexMap;
use rand::Rng;
use serde::Serialize;

/// Length of a generated referral token.
pub const REFERRAL_ID_LEN: usize = 8;

/// Number of entries on the overview leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

/// URL-safe token alphabet (64 symbols).
const REFERRAL_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Generate a new random referral token of [`REFERRAL_ID_LEN`] characters.
pub fn generate_referral_id() -> String {
    let mut rng = rand::rng();
    (0..REFERRAL_ID_LEN)
        .map(|_| char::from(REFERRAL_ALPHABET[rng.random_range(0..REFERRAL_ALPHABET.len())]))
        .collect()
}

/// Read access to the referral-relevant fields of a signup row.
///
/// Implemented by the database model so the graph can be built without this
/// crate knowing about rows.
pub trait Referrable {
    fn referral_id(&self) -> &str;
    fn display_name(&self) -> Option<&str>;
    fn email(&self) -> &str;
}

/// One leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopReferrer {
    pub referral_id: String,
    pub name: Option<String>,
    pub email: String,
    pub referral_count: i64,
}

/// Referral counts and token lookups for one waitlist.
///
/// `counts` come from a single grouped query and are kept in the order they
/// were supplied; that order is the leaderboard tie-break.
pub struct ReferralGraph<'a, S> {
    by_token: HashMap<&'a str, &'a S>,
    counts: IndexMap<String, i64>,
}

impl<'a, S: Referrable> ReferralGraph<'a, S> {
    pub fn new(signups: &'a [S], counts: impl IntoIterator<Item = (String, i64)>) -> Self {
        let by_token = signups.iter().map(|s| (s.referral_id(), s)).collect();
        let mut ordered: IndexMap<String, i64> = IndexMap::new();
        for (token, count) in counts {
            if token.is_empty() {
                continue;
            }
            *ordered.entry(token).or_insert(0) += count;
        }
        Self {
            by_token,
            counts: ordered,
        }
    }

    /// Number of signups whose `referred_by` equals `referral_id`.
    pub fn referral_count(&self, referral_id: &str) -> i64 {
        self.counts.get(referral_id).copied().unwrap_or(0)
    }

    /// Display string of the signup owning `referred_by`: its name, else its
    /// email. `None` when there is no token or the token is dangling.
    pub fn referrer_name(&self, referred_by: Option<&str>) -> Option<String> {
        let owner = self.by_token.get(referred_by?)?;
        Some(display_label(*owner))
    }

    /// The `limit` signups with the most referrals, highest first.
    ///
    /// Tokens that no signup in the set owns are dropped, not zero-filled.
    pub fn top_referrers(&self, limit: usize) -> Vec<TopReferrer> {
        let mut entries: Vec<TopReferrer> = self
            .counts
            .iter()
            .filter_map(|(token, count)| {
                let owner = self.by_token.get(token.as_str())?;
                Some(TopReferrer {
                    referral_id: token.clone(),
                    name: owner.display_name().map(str::to_string),
                    email: owner.email().to_string(),
                    referral_count: *count,
                })
            })
            .collect();
        // Stable: equal counts keep their supplied order.
        entries.sort_by(|a, b| b.referral_count.cmp(&a.referral_count));
        entries.truncate(limit);
        entries
    }
}

fn display_label<S: Referrable>(signup: &S) -> String {
    signup
        .display_name()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| signup.email())
        .to_string()
}
