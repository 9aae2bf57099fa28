use pantry_tracker::ingredients::token_set_ratio;
use pantry_tracker::{diff_recipe, match_ingredient, match_many, parse, MATCH_THRESHOLD};

const PANTRY: [&str; 3] = ["garlic", "onion", "salt"];

#[test]
fn test_exact_match_ignores_case_and_whitespace() {
    for name in ["garlic", "GARLIC", "  Garlic  "] {
        let result = match_ingredient(name, &PANTRY);
        assert!(result.in_pantry, "{} should be in the pantry", name);
        assert_eq!(result.pantry_match.as_deref(), Some("garlic"));
        assert_eq!(result.score, 100.0);
    }
}

#[test]
fn test_empty_pantry_never_matches() {
    let empty: [&str; 0] = [];
    let result = match_ingredient("garlic", &empty);
    assert!(!result.in_pantry);
    assert!(result.pantry_match.is_none());
    assert_eq!(result.score, 0.0);
}

#[test]
fn test_fuzzy_match_garlic_cloves() {
    let result = match_ingredient("garlic cloves", &PANTRY);
    assert!(result.in_pantry);
    assert_eq!(result.pantry_match.as_deref(), Some("garlic"));
    assert!(result.score >= MATCH_THRESHOLD);
}

#[test]
fn test_unrelated_ingredient_is_missing() {
    let result = match_ingredient("saffron", &PANTRY);
    assert!(!result.in_pantry);
    assert!(result.pantry_match.is_none());
    assert!(result.score < MATCH_THRESHOLD);
}

#[test]
fn test_token_set_ratio_ignores_order_and_subsets() {
    assert_eq!(token_set_ratio("chicken breast", "breast chicken"), 100.0);
    assert_eq!(token_set_ratio("boneless chicken breast", "chicken breast"), 100.0);
    assert_eq!(token_set_ratio("", "garlic"), 0.0);
}

#[test]
fn test_parse_degenerate_input() {
    assert_eq!(parse("").name, "");
    assert_eq!(parse("   ").name, "");
    assert!(parse("salt").name.contains("salt"));
}

#[test]
fn test_parse_quantities_and_units() {
    let garlic = parse("3 cloves garlic");
    assert_eq!(garlic.name, "garlic");
    assert_eq!(garlic.quantity, Some(3.0));
    assert_eq!(garlic.unit.as_deref(), Some("clove"));

    let flour = parse("1 1/2 cups all-purpose flour, sifted");
    assert_eq!(flour.quantity, Some(1.5));
    assert_eq!(flour.unit.as_deref(), Some("cup"));
    assert_eq!(flour.name, "all-purpose flour");
    assert_eq!(flour.comment.as_deref(), Some("sifted"));
}

#[test]
fn test_diff_garlic_chicken() {
    let result = diff_recipe(
        &["3 cloves garlic", "1 lb chicken breast"],
        &["garlic", "olive oil"],
        Some("Garlic Chicken".to_string()),
        None,
    );

    assert_eq!(result.title.as_deref(), Some("Garlic Chicken"));
    assert!(result.in_pantry_count >= 1);
    assert!(result.missing_count >= 1);

    for status in &result.ingredients {
        if status.in_pantry {
            assert!(status.search_url.is_none());
        } else {
            assert!(status.search_url.as_deref().unwrap().contains("amazon.com"));
        }
    }

    let chicken = &result.ingredients[1];
    assert_eq!(chicken.raw, "1 lb chicken breast");
    assert_eq!(chicken.unit.as_deref(), Some("pound"));
    assert_eq!(
        chicken.search_url.as_deref(),
        Some("https://www.amazon.com/s?k=chicken+breast&i=wholefoods")
    );
}

#[test]
fn test_diff_counts_sum_to_line_count() {
    let lines = [
        "",
        "salt",
        "2 cups basmati rice",
        "a pinch of saffron",
        "1 (14 oz) can coconut milk",
        "onion, diced",
    ];
    let result = diff_recipe(&lines, &PANTRY, None, None);

    assert_eq!(result.ingredients.len(), lines.len());
    assert_eq!(result.missing_count + result.in_pantry_count, lines.len());
    let raws: Vec<&str> = result.ingredients.iter().map(|s| s.raw.as_str()).collect();
    assert_eq!(raws, lines);
}

#[test]
fn test_diff_empty_recipe() {
    let lines: [&str; 0] = [];
    let result = diff_recipe(&lines, &PANTRY, None, Some("https://example.com/r".to_string()));
    assert!(result.ingredients.is_empty());
    assert_eq!(result.missing_count, 0);
    assert_eq!(result.in_pantry_count, 0);
    assert_eq!(result.url.as_deref(), Some("https://example.com/r"));
}

#[test]
fn test_match_many_is_idempotent() {
    let names = ["garlic cloves", "saffron", "Sea Salt", "red onion"];
    let first = match_many(&names, &PANTRY);
    let second = match_many(&names, &PANTRY);
    assert_eq!(first, second);
    assert_eq!(first.len(), names.len());
}
