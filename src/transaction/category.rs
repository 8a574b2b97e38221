//! The fixed set of spending categories and the merchant lookup table.

use std::fmt::Display;

/// A spending bucket assigned to a transaction by its merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Food delivery and restaurants.
    Food,
    /// Online shopping.
    Shopping,
    /// Ride hailing and travel.
    Travel,
    /// Any merchant not in the lookup table.
    Others,
}

impl Category {
    /// The display name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Shopping => "Shopping",
            Category::Travel => "Travel",
            Category::Others => "Others",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower case merchant names and the category they belong to.
const MERCHANT_CATEGORIES: [(&str, Category); 6] = [
    ("zomato", Category::Food),
    ("swiggy", Category::Food),
    ("amazon", Category::Shopping),
    ("flipkart", Category::Shopping),
    ("uber", Category::Travel),
    ("ola", Category::Travel),
];

/// Get the category for `merchant`.
///
/// The lookup ignores case and requires the whole merchant name to match,
/// e.g. "ZOMATO" is [Category::Food] but "Zomato Gold" is [Category::Others].
pub fn categorize(merchant: &str) -> Category {
    let merchant = merchant.to_lowercase();

    MERCHANT_CATEGORIES
        .iter()
        .find(|(name, _)| *name == merchant)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Others)
}

#[cfg(test)]
mod tests {
    use super::{Category, MERCHANT_CATEGORIES, categorize};

    #[test]
    fn known_merchants_map_to_their_category() {
        assert_eq!(categorize("zomato"), Category::Food);
        assert_eq!(categorize("swiggy"), Category::Food);
        assert_eq!(categorize("amazon"), Category::Shopping);
        assert_eq!(categorize("flipkart"), Category::Shopping);
        assert_eq!(categorize("uber"), Category::Travel);
        assert_eq!(categorize("ola"), Category::Travel);
    }

    #[test]
    fn unknown_merchant_is_others() {
        assert_eq!(categorize("xyz"), Category::Others);
        assert_eq!(categorize(""), Category::Others);
        assert_eq!(categorize("Unknown"), Category::Others);
    }

    #[test]
    fn lookup_ignores_case() {
        for (name, category) in MERCHANT_CATEGORIES {
            let upper = name.to_uppercase();
            let mut title = name.to_owned();
            title[..1].make_ascii_uppercase();

            assert_eq!(categorize(&upper), category, "{upper}");
            assert_eq!(categorize(&title), category, "{title}");
        }

        assert_eq!(categorize("XYZ"), categorize("xyz"));
    }

    #[test]
    fn partial_names_do_not_match() {
        assert_eq!(categorize("zomatogold"), Category::Others);
        assert_eq!(categorize("amazon pay"), Category::Others);
    }

    #[test]
    fn displays_category_name() {
        assert_eq!(Category::Food.to_string(), "Food");
        assert_eq!(Category::Others.to_string(), "Others");
    }
}
