use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 订单状态
///
/// 状态流转统一由 [`TransactStatus::can_transition_to`] 判断:
/// - pending -> confirmed | cancelled
/// - confirmed -> pending | shipping | cancelled
/// - shipping -> completed | cancelled
/// - completed / cancelled 为终态
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum TransactStatus {
    #[sea_orm(num_value = 1)]
    Pending,
    #[sea_orm(num_value = 2)]
    Confirmed,
    #[sea_orm(num_value = 3)]
    Shipping,
    #[sea_orm(num_value = 4)]
    Completed,
    #[sea_orm(num_value = 5)]
    Cancelled,
}

impl TransactStatus {
    pub fn allowed_transitions(self) -> &'static [TransactStatus] {
        use TransactStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Pending, Shipping, Cancelled],
            Shipping => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: TransactStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// 只有待确认 / 已确认的订单允许修改明细或删除
    pub fn is_editable(self) -> bool {
        matches!(self, TransactStatus::Pending | TransactStatus::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransactStatus::Completed | TransactStatus::Cancelled)
    }
}

impl std::fmt::Display for TransactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactStatus::Pending => write!(f, "pending"),
            TransactStatus::Confirmed => write!(f, "confirmed"),
            TransactStatus::Shipping => write!(f, "shipping"),
            TransactStatus::Completed => write!(f, "completed"),
            TransactStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(num_value = 1)]
    Cod,
    #[sea_orm(num_value = 2)]
    BankTransfer,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub receiver_name: String,
    pub phone: String,
    pub address: String,
    pub location_id: Option<i32>,
    pub district: Option<String>,
    pub ward: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    pub transact_status: TransactStatus,
    pub paid: bool,
    pub deleted: bool,
    pub promotion_id: Option<i32>,
    pub voucher_id: Option<i32>,
    pub total_money: i64,
    pub total_discount: i64,
    pub order_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    pub ship_date: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::TransactStatus::*;

    #[test]
    fn test_terminal_states_have_no_transitions() {
        assert!(Completed.allowed_transitions().is_empty());
        assert!(Cancelled.allowed_transitions().is_empty());
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn test_shipping_cannot_go_back() {
        assert!(Shipping.can_transition_to(Completed));
        assert!(Shipping.can_transition_to(Cancelled));
        assert!(!Shipping.can_transition_to(Pending));
        assert!(!Shipping.can_transition_to(Confirmed));
    }

    #[test]
    fn test_editable_states() {
        assert!(Pending.is_editable());
        assert!(Confirmed.is_editable());
        assert!(!Shipping.is_editable());
        assert!(!Completed.is_editable());
        assert!(!Cancelled.is_editable());
    }

    #[test]
    fn test_pending_cannot_skip_to_shipping() {
        assert!(!Pending.can_transition_to(Shipping));
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Shipping));
    }
}
