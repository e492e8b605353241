//! Menu sorting
//!
//! Sorting always returns a new vector; the source slice is left untouched.
//! `slice::sort_by` is stable, so equal keys keep their original order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::FoodItem;

/// Client-side sort key for the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    /// Highest rated first, unrated last
    Rating,
    PriceAsc,
    PriceDesc,
}

impl SortType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rating" => Ok(Self::Rating),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            other => Err(format!("unknown sort type: {other}")),
        }
    }
}

/// Produce a sorted copy of `foods`
pub fn sort_foods(foods: &[FoodItem], sort: SortType) -> Vec<FoodItem> {
    let mut sorted = foods.to_vec();
    match sort {
        SortType::Rating => sorted.sort_by(compare_rating_desc),
        SortType::PriceAsc => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        SortType::PriceDesc => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
    }
    sorted
}

fn compare_rating_desc(a: &FoodItem, b: &FoodItem) -> Ordering {
    match (a.is_rated(), b.is_rated()) {
        (true, true) => {
            let (ra, rb) = (a.rating.unwrap_or_default(), b.rating.unwrap_or_default());
            rb.total_cmp(&ra)
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodCreate;
    use rust_decimal::Decimal;

    fn food(id: &str, price: i64, rating: Option<f64>) -> FoodItem {
        let mut item = FoodItem::new(
            id,
            FoodCreate {
                name: id.to_string(),
                price: Decimal::new(price, 0),
                image: String::new(),
            },
        );
        item.rating = rating;
        item
    }

    fn ids(foods: &[FoodItem]) -> Vec<&str> {
        foods.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_price_desc() {
        let foods = vec![food("a", 10, None), food("b", 30, None), food("c", 20, None)];
        let sorted = sort_foods(&foods, SortType::PriceDesc);
        let prices: Vec<Decimal> = sorted.iter().map(|f| f.price).collect();
        assert_eq!(
            prices,
            vec![Decimal::new(30, 0), Decimal::new(20, 0), Decimal::new(10, 0)]
        );
        // source untouched
        assert_eq!(ids(&foods), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_price_asc_is_idempotent_and_stable() {
        let foods = vec![
            food("a", 20, None),
            food("b", 10, None),
            food("c", 20, None),
            food("d", 10, None),
        ];
        let once = sort_foods(&foods, SortType::PriceAsc);
        let twice = sort_foods(&once, SortType::PriceAsc);
        assert_eq!(ids(&once), vec!["b", "d", "a", "c"]);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_rating_desc_unrated_last() {
        let foods = vec![
            food("new", 10, None),
            food("mid", 10, Some(3.5)),
            food("zero", 10, Some(0.0)),
            food("top", 10, Some(4.8)),
            food("mid2", 10, Some(3.5)),
        ];
        let sorted = sort_foods(&foods, SortType::Rating);
        assert_eq!(ids(&sorted), vec!["top", "mid", "mid2", "new", "zero"]);
    }

    #[test]
    fn test_parse_sort_type() {
        assert_eq!("rating".parse::<SortType>(), Ok(SortType::Rating));
        assert_eq!("price_asc".parse::<SortType>(), Ok(SortType::PriceAsc));
        assert_eq!("price_desc".parse::<SortType>(), Ok(SortType::PriceDesc));
        assert!("cheapest".parse::<SortType>().is_err());
        assert_eq!(SortType::PriceDesc.to_string(), "price_desc");
    }
}
