//! Region extraction from free-text Korean shipping addresses.

/// Known spellings of each province/metropolitan city and their short form.
/// Order matters for the two-character prefix fallback.
const PROVINCE_ALIASES: &[(&str, &str)] = &[
    ("서울", "서울"),
    ("서울시", "서울"),
    ("서울특별시", "서울"),
    ("부산", "부산"),
    ("부산시", "부산"),
    ("부산광역시", "부산"),
    ("대구", "대구"),
    ("대구시", "대구"),
    ("대구광역시", "대구"),
    ("인천", "인천"),
    ("인천시", "인천"),
    ("인천광역시", "인천"),
    ("광주", "광주"),
    ("광주시", "광주"),
    ("광주광역시", "광주"),
    ("대전", "대전"),
    ("대전시", "대전"),
    ("대전광역시", "대전"),
    ("울산", "울산"),
    ("울산시", "울산"),
    ("울산광역시", "울산"),
    ("세종", "세종"),
    ("세종시", "세종"),
    ("세종특별자치시", "세종"),
    ("경기", "경기"),
    ("경기도", "경기"),
    ("강원", "강원"),
    ("강원도", "강원"),
    ("강원특별자치도", "강원"),
    ("충북", "충북"),
    ("충청북", "충북"),
    ("충청북도", "충북"),
    ("충남", "충남"),
    ("충청남", "충남"),
    ("충청남도", "충남"),
    ("전북", "전북"),
    ("전라북", "전북"),
    ("전라북도", "전북"),
    ("전북특별자치도", "전북"),
    ("전남", "전남"),
    ("전라남", "전남"),
    ("전라남도", "전남"),
    ("경북", "경북"),
    ("경상북", "경북"),
    ("경상북도", "경북"),
    ("경남", "경남"),
    ("경상남", "경남"),
    ("경상남도", "경남"),
    ("제주", "제주"),
    ("제주도", "제주"),
    ("제주특별자치도", "제주"),
];

/// Short province name for a first address token; unknown tokens pass through.
pub fn standardize_province(token: &str) -> String {
    let token = token.trim();
    if let Some((_, short)) = PROVINCE_ALIASES.iter().find(|(alias, _)| *alias == token) {
        return short.to_string();
    }

    let prefix: String = token.chars().take(2).collect();
    if prefix.chars().count() == 2 {
        for (alias, short) in PROVINCE_ALIASES {
            let alias_prefix: String = alias.chars().take(2).collect();
            if alias_prefix == prefix {
                return short.to_string();
            }
        }
    }

    token.to_string()
}

/// `"<province> <district>"` from the first two address tokens.
pub fn extract_region(address: &str) -> Option<String> {
    let mut parts = address.split_whitespace();
    let first = parts.next()?;
    let province = standardize_province(first);
    match parts.next() {
        Some(second) => Some(format!("{province} {second}")),
        None => Some(province),
    }
}
