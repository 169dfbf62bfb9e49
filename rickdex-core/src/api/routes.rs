//! Route constants and URL construction for the character endpoint.

use rickdex_model::CharacterQuery;
use url::Url;

/// Character listing and search.
pub const CHARACTER: &str = "character";

/// Build `<base>/character?name=..&status=..&page=..` for a query.
///
/// `base` must end with `/`; [`rickdex_config::normalize_base_url`]
/// guarantees that.
pub fn character_url(
    base: &Url,
    query: &CharacterQuery,
) -> Result<Url, url::ParseError> {
    let mut url = base.join(CHARACTER)?;
    url.query_pairs_mut().extend_pairs(query.query_pairs());
    Ok(url)
}
