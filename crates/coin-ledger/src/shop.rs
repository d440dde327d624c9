//! The coin shop catalogue and purchase flow.

use thiserror::Error;

use crate::account::UserId;
use crate::error::LedgerError;
use crate::ledger::CoinLedger;
use crate::notice::Notice;
use crate::ports::KeyValueStore;

/// A purchasable shop entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopItem {
    /// Stable catalogue id.
    pub id: &'static str,
    /// Display title, also used in the purchase description.
    pub title: &'static str,
    /// Short marketing blurb.
    pub description: &'static str,
    /// Price in coins.
    pub price: u32,
    /// Shown with a "New" badge.
    pub is_new: bool,
    /// Shown with a "Best Seller" badge.
    pub is_best_seller: bool,
}

impl ShopItem {
    /// Returns `true` when `balance` covers the price.
    #[must_use]
    pub const fn can_afford(&self, balance: u32) -> bool {
        balance >= self.price
    }
}

static CATALOGUE: [ShopItem; 4] = [
    ShopItem {
        id: "premium-1",
        title: "Ad-Free Experience",
        description: "Enjoy the app without any advertisements for 30 days",
        price: 200,
        is_new: false,
        is_best_seller: true,
    },
    ShopItem {
        id: "premium-2",
        title: "Priority Support",
        description: "Get faster responses to your travel queries",
        price: 150,
        is_new: false,
        is_best_seller: false,
    },
    ShopItem {
        id: "premium-3",
        title: "Exclusive Itineraries",
        description: "Access to premium travel routes and hidden gems",
        price: 300,
        is_new: true,
        is_best_seller: false,
    },
    ShopItem {
        id: "filter-1",
        title: "Vintage Filter Pack",
        description: "Classic filters to give your travel photos a timeless look",
        price: 100,
        is_new: false,
        is_best_seller: false,
    },
];

/// Lookup failures against the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    /// No catalogue entry has the requested id.
    #[error("unknown shop item: {id}")]
    UnknownItem {
        /// The requested id.
        id: String,
    },
}

/// The fixed set of items on sale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShopCatalog;

impl ShopCatalog {
    /// All items in display order.
    #[must_use]
    pub fn items(&self) -> &'static [ShopItem] {
        &CATALOGUE
    }

    /// Find an item by id.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::UnknownItem`] when `id` is not in the catalogue.
    pub fn find(&self, id: &str) -> Result<&'static ShopItem, ShopError> {
        CATALOGUE
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| ShopError::UnknownItem { id: id.to_owned() })
    }
}

/// Buy `item` for `user_id`, returning the notice to show.
///
/// # Errors
///
/// Propagates [`LedgerError`] from [`CoinLedger::purchase`]; running short
/// of coins is reported as [`Notice::InsufficientCoins`], not as an error.
pub fn purchase_item<S: KeyValueStore>(
    ledger: &CoinLedger<S>,
    user_id: &UserId,
    item: &ShopItem,
) -> Result<Notice, LedgerError> {
    let item_name = item.title.to_owned();
    if ledger.purchase(user_id, item.title, item.price)? {
        Ok(Notice::Purchased { item: item_name })
    } else {
        Ok(Notice::InsufficientCoins { item: item_name })
    }
}
