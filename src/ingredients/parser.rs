use log::{debug, warn};
use regex::Regex;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::model::{normalize_name, ParsedIngredient};

pub type BoxError = Box<dyn Error + Send + Sync>;

/// One quantity/unit pair as reported by a natural-language parser.
/// Values are left as text; normalization happens in [`IngredientParser`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amount {
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

/// Raw output of a natural-language ingredient parser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawIngredient {
    pub name: Option<String>,
    pub amounts: Vec<Amount>,
    pub comment: Option<String>,
}

/// Capability that splits a free-text ingredient line into its parts
pub trait NaturalLanguageParser: Send + Sync {
    /// Get the backend name (e.g., "rules")
    fn name(&self) -> &str;

    fn parse(&self, raw: &str) -> Result<RawIngredient, BoxError>;
}

/// Turns raw ingredient lines into [`ParsedIngredient`]s.
///
/// Never fails: when the backend is missing or errors out, the whole line
/// (lowercased) becomes the ingredient name.
#[derive(Clone)]
pub struct IngredientParser {
    backend: Option<Arc<dyn NaturalLanguageParser>>,
}

impl fmt::Debug for IngredientParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngredientParser")
            .field("backend", &self.backend_name())
            .finish()
    }
}

impl Default for IngredientParser {
    /// Uses the bundled [`RuleBasedParser`] when it can be built
    fn default() -> Self {
        match RuleBasedParser::new() {
            Ok(rules) => Self::new(Arc::new(rules)),
            Err(e) => {
                warn!("Rule based ingredient parser unavailable, using raw text: {}", e);
                Self::without_backend()
            }
        }
    }
}

impl IngredientParser {
    pub fn new(backend: Arc<dyn NaturalLanguageParser>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A parser with no backend; every line becomes its own name
    pub fn without_backend() -> Self {
        Self { backend: None }
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_ref().map(|b| b.name())
    }

    pub fn parse(&self, raw: &str) -> ParsedIngredient {
        let raw = raw.trim();
        if raw.is_empty() {
            return ParsedIngredient::default();
        }

        let fallback = || ParsedIngredient {
            raw: raw.to_string(),
            name: raw.to_lowercase(),
            ..Default::default()
        };

        let Some(backend) = &self.backend else {
            return fallback();
        };

        let parsed = match backend.parse(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Parser '{}' failed on {:?}: {}", backend.name(), raw, e);
                return fallback();
            }
        };
        debug!("{:?} -> {:?}", raw, parsed);

        let name = parsed
            .name
            .as_deref()
            .map(normalize_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| raw.to_lowercase());

        let first = parsed.amounts.into_iter().next().unwrap_or_default();
        let quantity = first.quantity.as_deref().and_then(parse_quantity);
        let unit = first
            .unit
            .map(|u| u.trim().to_lowercase())
            .filter(|u| !u.is_empty());
        let comment = parsed
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        ParsedIngredient {
            raw: raw.to_string(),
            name,
            quantity,
            unit,
            comment,
        }
    }

    /// Parse every line, preserving order
    pub fn parse_many<S: AsRef<str>>(&self, raws: &[S]) -> Vec<ParsedIngredient> {
        raws.iter().map(|raw| self.parse(raw.as_ref())).collect()
    }
}

/// Parse a quantity such as `"2"`, `"0.5"`, `"1/2"`, `"1 1/2"` or `"½"`.
///
/// Anything else, including non-finite values and zero denominators, is `None`.
pub fn parse_quantity(value: &str) -> Option<f64> {
    let mut parts = value.split_whitespace();
    let quantity = match (parts.next(), parts.next(), parts.next()) {
        (Some(single), None, None) => parse_component(single),
        (Some(whole), Some(fraction), None) => {
            let whole = whole.parse::<u32>().ok()?;
            if !is_fraction(fraction) {
                return None;
            }
            Some(f64::from(whole) + parse_component(fraction)?)
        }
        _ => None,
    };
    quantity.filter(|q| q.is_finite())
}

fn is_fraction(value: &str) -> bool {
    value.contains('/') || (value.chars().count() == 1 && vulgar_fraction(value).is_some())
}

fn parse_component(value: &str) -> Option<f64> {
    if let Ok(number) = value.parse::<f64>() {
        return Some(number);
    }

    if let Some((numerator, denominator)) = value.split_once('/') {
        let numerator = numerator.trim().parse::<f64>().ok()?;
        let denominator = denominator.trim().parse::<f64>().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    // "½" or "1½"
    let last = value.chars().last()?;
    let fraction = vulgar_fraction(&last.to_string())?;
    let whole = &value[..value.len() - last.len_utf8()];
    if whole.is_empty() {
        Some(fraction)
    } else {
        Some(f64::from(whole.parse::<u32>().ok()?) + fraction)
    }
}

fn vulgar_fraction(symbol: &str) -> Option<f64> {
    let value = match symbol {
        "½" => 1.0 / 2.0,
        "⅓" => 1.0 / 3.0,
        "⅔" => 2.0 / 3.0,
        "¼" => 1.0 / 4.0,
        "¾" => 3.0 / 4.0,
        "⅕" => 1.0 / 5.0,
        "⅖" => 2.0 / 5.0,
        "⅗" => 3.0 / 5.0,
        "⅘" => 4.0 / 5.0,
        "⅙" => 1.0 / 6.0,
        "⅚" => 5.0 / 6.0,
        "⅛" => 1.0 / 8.0,
        "⅜" => 3.0 / 8.0,
        "⅝" => 5.0 / 8.0,
        "⅞" => 7.0 / 8.0,
        _ => return None,
    };
    Some(value)
}

/// Canonical unit followed by the spellings that map to it
const UNITS: &[(&str, &[&str])] = &[
    ("cup", &["cup", "cups", "c"]),
    ("tablespoon", &["tablespoon", "tablespoons", "tbsp", "tbsps", "tbs", "tbl"]),
    ("teaspoon", &["teaspoon", "teaspoons", "tsp", "tsps"]),
    ("fluid ounce", &["fl oz", "fluid ounce", "fluid ounces"]),
    ("ounce", &["ounce", "ounces", "oz"]),
    ("pound", &["pound", "pounds", "lb", "lbs"]),
    ("gram", &["gram", "grams", "g", "gr"]),
    ("kilogram", &["kilogram", "kilograms", "kg", "kgs"]),
    ("milligram", &["milligram", "milligrams", "mg"]),
    ("liter", &["liter", "liters", "litre", "litres", "l"]),
    ("milliliter", &["milliliter", "milliliters", "millilitre", "millilitres", "ml"]),
    ("pint", &["pint", "pints", "pt"]),
    ("quart", &["quart", "quarts", "qt"]),
    ("gallon", &["gallon", "gallons", "gal"]),
    ("pinch", &["pinch", "pinches"]),
    ("dash", &["dash", "dashes"]),
    ("clove", &["clove", "cloves"]),
    ("can", &["can", "cans"]),
    ("jar", &["jar", "jars"]),
    ("bottle", &["bottle", "bottles"]),
    ("package", &["package", "packages", "pkg", "packet", "packets"]),
    ("bag", &["bag", "bags"]),
    ("slice", &["slice", "slices"]),
    ("stick", &["stick", "sticks"]),
    ("bunch", &["bunch", "bunches"]),
    ("sprig", &["sprig", "sprigs"]),
    ("head", &["head", "heads"]),
    ("handful", &["handful", "handfuls"]),
    ("piece", &["piece", "pieces"]),
];

const QUANTITY: &str = r"\d+\s+\d+/\d+|\d+\s*[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞]|\d+/\d+|\d*\.\d+|\d+|[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞]";

/// Bundled [`NaturalLanguageParser`] built from a handful of regular
/// expressions. Understands a leading quantity (ranges keep the lower bound),
/// a unit from a fixed table, an optional "of", and treats parenthesised text,
/// anything after the first comma, and phrases like "to taste" as comment.
#[derive(Debug, Clone)]
pub struct RuleBasedParser {
    bullet: Regex,
    parenthesised: Regex,
    trailing_comment: Regex,
    quantity: Regex,
    unit: Regex,
    of: Regex,
}

impl RuleBasedParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            bullet: Regex::new(r"^\s*(?:[-*•▢]|\d+[.)](?:\s|$))\s*")?,
            parenthesised: Regex::new(r"\(([^)]*)\)")?,
            trailing_comment: Regex::new(
                r"(?i)\s*\b(to taste|as needed|for garnish|for serving|optional)\s*$",
            )?,
            quantity: Regex::new(&format!(
                r"^(?P<qty>{QUANTITY})(?:\s*(?:-|–|to)\s*(?:{QUANTITY}))?\s*"
            ))?,
            unit: Regex::new(r"(?i)^(?P<unit>fl\.?\s+oz|fluid\s+ounces?|[a-z]+)\.?(?:\s+|$)")?,
            of: Regex::new(r"(?i)^of\s+")?,
        })
    }

    fn split_unit<'a>(&self, text: &'a str) -> (Option<&'static str>, &'a str) {
        let Some(caps) = self.unit.captures(text) else {
            return (None, text);
        };
        let word = caps["unit"].to_lowercase().replace('.', "");
        let word = word.split_whitespace().collect::<Vec<_>>().join(" ");
        match canonical_unit(&word) {
            Some(unit) => (Some(unit), &text[caps[0].len()..]),
            None => (None, text),
        }
    }
}

impl NaturalLanguageParser for RuleBasedParser {
    fn name(&self) -> &str {
        "rules"
    }

    fn parse(&self, raw: &str) -> Result<RawIngredient, BoxError> {
        let mut comments: Vec<String> = Vec::new();

        let line = self.bullet.replace(raw, "");
        for caps in self.parenthesised.captures_iter(&line) {
            comments.push(caps[1].trim().to_string());
        }
        let line = self.parenthesised.replace_all(&line, " ");

        let (head, tail) = match line.split_once(',') {
            Some((head, tail)) => (head, Some(tail)),
            None => (&line[..], None),
        };
        let mut head = head.trim().to_string();
        if let Some(caps) = self.trailing_comment.captures(&head) {
            comments.push(caps[1].to_string());
            let cut = head.len() - caps[0].len();
            head.truncate(cut);
        }
        if let Some(tail) = tail {
            comments.push(tail.trim().to_string());
        }

        let mut amounts = Vec::new();
        let mut rest = head.as_str();
        if let Some(caps) = self.quantity.captures(rest) {
            let quantity = caps["qty"].to_string();
            rest = &rest[caps[0].len()..];
            let (unit, remainder) = self.split_unit(rest);
            rest = remainder;
            amounts.push(Amount {
                quantity: Some(quantity),
                unit: unit.map(str::to_string),
            });
        }
        let rest = self.of.replace(rest, "");

        let name = rest.split_whitespace().collect::<Vec<_>>().join(" ");
        let comment = comments
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(RawIngredient {
            name: Some(name).filter(|n| !n.is_empty()),
            amounts,
            comment: Some(comment).filter(|c| !c.is_empty()),
        })
    }
}

fn canonical_unit(word: &str) -> Option<&'static str> {
    UNITS
        .iter()
        .find(|(_, spellings)| spellings.contains(&word))
        .map(|(canonical, _)| *canonical)
}

/// Parse one line with the default parser
pub fn parse(raw: &str) -> ParsedIngredient {
    IngredientParser::default().parse(raw)
}

/// Parse many lines with the default parser, preserving order
pub fn parse_many<S: AsRef<str>>(raws: &[S]) -> Vec<ParsedIngredient> {
    IngredientParser::default().parse_many(raws)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingParser;

    impl NaturalLanguageParser for FailingParser {
        fn name(&self) -> &str {
            "failing"
        }

        fn parse(&self, _raw: &str) -> Result<RawIngredient, BoxError> {
            Err("model not loaded".into())
        }
    }

    struct EmptyParser;

    impl NaturalLanguageParser for EmptyParser {
        fn name(&self) -> &str {
            "empty"
        }

        fn parse(&self, _raw: &str) -> Result<RawIngredient, BoxError> {
            Ok(RawIngredient::default())
        }
    }

    #[test]
    fn test_parse_empty() {
        let parser = IngredientParser::default();
        assert_eq!(parser.parse("").name, "");
        assert_eq!(parser.parse("   ").raw, "");
    }

    #[test]
    fn test_parse_basic() {
        let result = parse("2 cups flour");
        assert_eq!(result.raw, "2 cups flour");
        assert_eq!(result.name, "flour");
        assert_eq!(result.quantity, Some(2.0));
        assert_eq!(result.unit.as_deref(), Some("cup"));
        assert!(result.comment.is_none());
    }

    #[test]
    fn test_parse_with_comment() {
        let result = parse("2 cups Onion, diced");
        assert_eq!(result.name, "onion");
        assert_eq!(result.comment.as_deref(), Some("diced"));
    }

    #[test]
    fn test_parse_no_quantity() {
        let result = parse("salt");
        assert!(result.name.contains("salt"));
        assert!(result.quantity.is_none());
        assert!(result.unit.is_none());
    }

    #[test]
    fn test_parse_fraction_and_of() {
        let result = parse("1/2 cup of sugar");
        assert_eq!(result.quantity, Some(0.5));
        assert_eq!(result.unit.as_deref(), Some("cup"));
        assert_eq!(result.name, "sugar");
    }

    #[test]
    fn test_parse_mixed_number_and_parentheses() {
        let result = parse("1 1/2 lbs chicken thighs (boneless)");
        assert_eq!(result.quantity, Some(1.5));
        assert_eq!(result.unit.as_deref(), Some("pound"));
        assert_eq!(result.name, "chicken thighs");
        assert_eq!(result.comment.as_deref(), Some("boneless"));
    }

    #[test]
    fn test_parse_cloves_unit() {
        let result = parse("3 cloves garlic");
        assert_eq!(result.quantity, Some(3.0));
        assert_eq!(result.unit.as_deref(), Some("clove"));
        assert_eq!(result.name, "garlic");
    }

    #[test]
    fn test_parse_attached_unit_and_range() {
        let result = parse("500g flour");
        assert_eq!(result.quantity, Some(500.0));
        assert_eq!(result.unit.as_deref(), Some("gram"));
        assert_eq!(result.name, "flour");

        let result = parse("2-3 tbsp. olive oil");
        assert_eq!(result.quantity, Some(2.0));
        assert_eq!(result.unit.as_deref(), Some("tablespoon"));
        assert_eq!(result.name, "olive oil");
    }

    #[test]
    fn test_parse_unit_free_count() {
        let result = parse("2 large eggs");
        assert_eq!(result.quantity, Some(2.0));
        assert!(result.unit.is_none());
        assert_eq!(result.name, "large eggs");
    }

    #[test]
    fn test_parse_trailing_phrase_becomes_comment() {
        let result = parse("Salt and pepper to taste");
        assert_eq!(result.name, "salt and pepper");
        assert_eq!(result.comment.as_deref(), Some("to taste"));
    }

    #[test]
    fn test_parse_strips_bullets() {
        let result = parse("- 1 can chickpeas, drained");
        assert_eq!(result.quantity, Some(1.0));
        assert_eq!(result.unit.as_deref(), Some("can"));
        assert_eq!(result.name, "chickpeas");
    }

    #[test]
    fn test_parse_vulgar_fraction() {
        let result = parse("½ tsp cumin");
        assert_eq!(result.quantity, Some(0.5));
        assert_eq!(result.unit.as_deref(), Some("teaspoon"));
        assert_eq!(result.name, "cumin");
    }

    #[test]
    fn test_parse_many_preserves_order() {
        let results = parse_many(&["1 cup milk", "2 eggs", "salt"]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].name, "milk");
        assert_eq!(results[1].name, "eggs");
        assert_eq!(results[2].name, "salt");
        for r in &results {
            assert!(!r.name.is_empty());
        }
    }

    #[test]
    fn test_without_backend_uses_raw_text() {
        let parser = IngredientParser::without_backend();
        let result = parser.parse("  2 Cups Flour ");
        assert_eq!(result.raw, "2 Cups Flour");
        assert_eq!(result.name, "2 cups flour");
        assert!(result.quantity.is_none());
        assert!(parser.backend_name().is_none());
    }

    #[test]
    fn test_failing_backend_degrades_to_raw_text() {
        let parser = IngredientParser::new(Arc::new(FailingParser));
        let result = parser.parse("1 Lemon");
        assert_eq!(result.name, "1 lemon");
    }

    #[test]
    fn test_backend_without_name_falls_back_to_raw() {
        let parser = IngredientParser::new(Arc::new(EmptyParser));
        let result = parser.parse("Mystery Spice");
        assert_eq!(result.name, "mystery spice");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("2"), Some(2.0));
        assert_eq!(parse_quantity("0.25"), Some(0.25));
        assert_eq!(parse_quantity("1/2"), Some(0.5));
        assert_eq!(parse_quantity("1 1/2"), Some(1.5));
        assert_eq!(parse_quantity("1½"), Some(1.5));
        assert_eq!(parse_quantity("2 ¼"), Some(2.25));
        assert_eq!(parse_quantity("1/0"), None);
        assert_eq!(parse_quantity("a few"), None);
        assert_eq!(parse_quantity("inf"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("1 2"), None);
    }
}
