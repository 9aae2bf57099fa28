/// Categories the model may assign to a detected item
pub const CATEGORIES: &[&str] = &[
    "produce",
    "dairy",
    "meat",
    "seafood",
    "bakery",
    "frozen",
    "canned",
    "dry goods",
    "beverages",
    "snacks",
    "condiments",
    "spices",
    "other",
];

pub const GROCERY_DETECTION_PROMPT: &str = r#"You are a grocery detection assistant. Analyze the provided image and identify all grocery or food items visible. The image may be a receipt, a photo of food items, or a pantry shelf.

For each item detected, return:
- name: the grocery item name in lowercase. Include descriptors that change WHAT the item is: preparation (sliced, diced, shredded), texture (extra firm, creamy), cut (breast, thigh, fillet), sub-type (deli, smoked, aged), and form (whole wheat, sourdough). Examples: 'sliced turkey breast', 'extra firm tofu', 'sliced gouda cheese', 'whole wheat bread', 'extra virgin olive oil'.
  OMIT descriptors that do NOT change the item identity: size (large, small, medium), organic/conventional, brand names, origin (hass, fuji), and marketing terms. Put these in the notes field instead. Examples: 'large hass avocado' becomes name 'avocado', 'organic banana' becomes name 'banana'.
- quantity: numeric quantity if visible (null otherwise)
- unit: unit of measurement if visible (null otherwise)
- category: one of produce, dairy, meat, seafood, bakery, frozen, canned, dry goods, beverages, snacks, condiments, spices, or other
- notes: any extra detail like brand (null otherwise)

If no grocery items are detected, return an empty list."#;
