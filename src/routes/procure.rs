use axum::Router;

use super::{crud, value_label};
use crate::{
    AppState,
    models::procure::{
        Item, ItemWorkOrder, ItemWorkOrderEntry, PurchaseCostCenter, Requisition, SubCategory,
        Vendor,
    },
};

/// Procurement Router Module
pub fn procure_routes() -> Router<AppState> {
    Router::new()
        .merge(crud::<SubCategory>())
        .merge(crud::<PurchaseCostCenter>())
        .merge(crud::<Vendor>())
        .merge(crud::<Item>())
        .merge(crud::<Requisition>())
        .merge(crud::<ItemWorkOrder>())
        .merge(crud::<ItemWorkOrderEntry>())
        .merge(value_label::<SubCategory>())
        .merge(value_label::<PurchaseCostCenter>())
        // GET /other/procure/item-work-order/value/label?vendor_uuid=&bill_uuid=&is_bill=
        .merge(value_label::<ItemWorkOrder>())
}
