//! Decides whether a category may be deleted.

use serde::Serialize;

use crate::category::Category;

/// Whether a category may be deleted and, if not, why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionCheck {
    /// Whether the category may be deleted.
    #[serde(rename = "podeRemover")]
    pub allowed: bool,
    /// The number of transactions that use the category.
    #[serde(rename = "quantidadeTransacoes")]
    pub transaction_count: u32,
    /// Why the category may not be deleted.
    #[serde(rename = "motivo")]
    pub reason: Option<String>,
}

/// A category may only be deleted once no transaction uses it.
pub fn can_delete_category(category: &Category, transaction_count: u32) -> DeletionCheck {
    if transaction_count == 0 {
        return DeletionCheck {
            allowed: true,
            transaction_count,
            reason: None,
        };
    }

    DeletionCheck {
        allowed: false,
        transaction_count,
        reason: Some(format!(
            "The category \"{}\" is used by {} transaction(s). Delete or move them first.",
            category.description, transaction_count
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        category::{Category, CategoryPurpose, can_delete_category},
        description::Description,
    };

    fn category() -> Category {
        Category {
            id: 1,
            description: Description::new_unchecked("Mercado"),
            purpose: CategoryPurpose::Expense,
        }
    }

    #[test]
    fn unused_category_may_be_deleted() {
        let check = can_delete_category(&category(), 0);

        assert!(check.allowed);
        assert_eq!(check.reason, None);
    }

    #[test]
    fn used_category_may_not_be_deleted() {
        for count in [1, 2, 17, u32::MAX] {
            let check = can_delete_category(&category(), count);

            assert!(!check.allowed, "count {count}");
            assert_eq!(check.transaction_count, count);
        }
    }

    #[test]
    fn reason_mentions_count() {
        let check = can_delete_category(&category(), 2);

        let reason = check.reason.expect("missing reason");
        assert!(reason.contains('2'), "got {reason}");
        assert!(reason.contains("Mercado"), "got {reason}");
    }

    #[test]
    fn serializes_with_api_field_names() {
        let json = serde_json::to_value(can_delete_category(&category(), 0)).unwrap();

        assert_eq!(json["podeRemover"], true);
        assert_eq!(json["quantidadeTransacoes"], 0);
        assert!(json["motivo"].is_null());
    }
}
