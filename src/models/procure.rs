//! Procurement: sub-categories, cost centers, vendors, items, requisitions and item
//! work orders with their entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use validator::Validate;

use crate::{
    repository::{Column, Direction, ListFilter, OrderBy, Table},
    schema::{Resource, ValueLabel, date_time, form, tri_state},
};

// --- Sub-category ---

pub static SUB_CATEGORY_TABLE: Table = Table {
    name: "procure.sub_category",
    select: r#"
        SELECT
            sub_category.id,
            sub_category.uuid,
            sub_category."index",
            sub_category.name,
            sub_category."type",
            sub_category.min_amount::float8 AS min_amount,
            sub_category.min_quotation::float8 AS min_quotation,
            to_char(sub_category.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(sub_category.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            sub_category.created_by,
            creator.name AS created_by_name,
            sub_category.remarks
        FROM procure.sub_category
        LEFT JOIN hr.users creator ON sub_category.created_by = creator.uuid
    "#,
    columns: &[
        Column::integer("index"),
        Column::text("name"),
        Column::text("type"),
        Column::decimal("min_amount"),
        Column::decimal("min_quotation"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "name",
    order_by: Some(OrderBy {
        column: "index",
        direction: Direction::Asc,
    }),
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SubCategory {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub index: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub min_amount: Option<f64>,
    pub min_quotation: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubCategoryPayload {
    #[serde(default, deserialize_with = "form::opt_i64")]
    pub index: Option<i64>,
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(required)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    #[validate(range(min = 0.0))]
    pub min_amount: Option<f64>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    #[validate(range(min = 0.0))]
    pub min_quotation: Option<f64>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for SubCategory {
    type Payload = SubCategoryPayload;
    const NAME: &'static str = "sub category";
    const PATH: &'static str = "/procure/sub-category";
    const TABLE: &'static Table = &SUB_CATEGORY_TABLE;
}

impl ValueLabel for SubCategory {
    const EXTRA: &'static [&'static str] = &["min_amount", "min_quotation"];
}

// --- Purchase cost center ---

pub static PURCHASE_COST_CENTER_TABLE: Table = Table {
    name: "procure.purchase_cost_center",
    select: r#"
        SELECT
            pcc.id,
            pcc.uuid,
            pcc."index",
            pcc.sub_category_uuid,
            sub_category.name AS sub_category_name,
            sub_category."type" AS sub_category_type,
            pcc.name,
            to_char(pcc."from", 'YYYY-MM-DD HH24:MI:SS') AS "from",
            to_char(pcc."to", 'YYYY-MM-DD HH24:MI:SS') AS "to",
            pcc.budget::float8 AS budget,
            to_char(pcc.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(pcc.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            pcc.created_by,
            creator.name AS created_by_name,
            pcc.remarks
        FROM procure.purchase_cost_center pcc
        LEFT JOIN procure.sub_category ON pcc.sub_category_uuid = sub_category.uuid
        LEFT JOIN hr.users creator ON pcc.created_by = creator.uuid
    "#,
    columns: &[
        Column::integer("index"),
        Column::text("sub_category_uuid"),
        Column::text("name"),
        Column::timestamp("from"),
        Column::timestamp("to"),
        Column::decimal("budget"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "name",
    order_by: None,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PurchaseCostCenter {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub index: Option<i64>,
    pub sub_category_uuid: String,
    pub sub_category_name: Option<String>,
    pub sub_category_type: Option<String>,
    pub name: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub budget: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PurchaseCostCenterPayload {
    #[serde(default, deserialize_with = "form::opt_i64")]
    pub index: Option<i64>,
    #[validate(required, length(equal = 21))]
    pub sub_category_uuid: Option<String>,
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub from: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    pub budget: Option<f64>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for PurchaseCostCenter {
    type Payload = PurchaseCostCenterPayload;
    const NAME: &'static str = "purchase cost center";
    const PATH: &'static str = "/procure/purchase-cost-center";
    const TABLE: &'static Table = &PURCHASE_COST_CENTER_TABLE;
}

impl ValueLabel for PurchaseCostCenter {}

// --- Vendor ---

pub static VENDOR_TABLE: Table = Table {
    name: "procure.vendor",
    select: r#"
        SELECT
            vendor.id,
            vendor.uuid,
            vendor.name,
            vendor.phone,
            vendor.address,
            vendor.purpose,
            to_char(vendor.starting_date, 'YYYY-MM-DD HH24:MI:SS') AS starting_date,
            to_char(vendor.ending_date, 'YYYY-MM-DD HH24:MI:SS') AS ending_date,
            vendor.product_type,
            to_char(vendor.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(vendor.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            vendor.created_by,
            creator.name AS created_by_name,
            vendor.remarks
        FROM procure.vendor
        LEFT JOIN hr.users creator ON vendor.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("name"),
        Column::text("phone"),
        Column::text("address"),
        Column::text("purpose"),
        Column::timestamp("starting_date"),
        Column::timestamp("ending_date"),
        Column::text("product_type"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "name",
    order_by: None,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Vendor {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub purpose: Option<String>,
    pub starting_date: Option<String>,
    pub ending_date: Option<String>,
    pub product_type: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct VendorPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    pub phone: Option<String>,
    #[validate(required, length(min = 1))]
    pub address: Option<String>,
    #[validate(required, length(min = 1))]
    pub purpose: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub starting_date: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub ending_date: Option<String>,
    #[validate(required, length(min = 1))]
    pub product_type: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for Vendor {
    type Payload = VendorPayload;
    const NAME: &'static str = "vendor";
    const PATH: &'static str = "/procure/vendor";
    const TABLE: &'static Table = &VENDOR_TABLE;
}

// --- Item ---

pub static ITEM_TABLE: Table = Table {
    name: "procure.item",
    select: r#"
        SELECT
            item.id,
            item.uuid,
            item.purchase_cost_center_uuid,
            pcc.name AS purchase_cost_center_name,
            item.sub_purchase_cost_center_uuid,
            item.name,
            item."index",
            item.quantity::float8 AS quantity,
            item.vendor_price::float8 AS vendor_price,
            to_char(item.price_validity, 'YYYY-MM-DD HH24:MI:SS') AS price_validity,
            item.unit,
            item.threshold::float8 AS threshold,
            item.lead_time,
            to_char(item.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(item.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            item.created_by,
            creator.name AS created_by_name,
            item.remarks
        FROM procure.item
        LEFT JOIN procure.purchase_cost_center pcc ON item.purchase_cost_center_uuid = pcc.uuid
        LEFT JOIN hr.users creator ON item.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("purchase_cost_center_uuid"),
        Column::text("sub_purchase_cost_center_uuid"),
        Column::text("name"),
        Column::integer("index"),
        Column::decimal("quantity"),
        Column::decimal("vendor_price"),
        Column::timestamp("price_validity"),
        Column::text("unit"),
        Column::decimal("threshold"),
        Column::integer("lead_time"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "name",
    order_by: None,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Item {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub purchase_cost_center_uuid: String,
    pub purchase_cost_center_name: Option<String>,
    pub sub_purchase_cost_center_uuid: Option<String>,
    pub name: String,
    pub index: Option<i64>,
    pub quantity: Option<f64>,
    pub vendor_price: Option<f64>,
    pub price_validity: Option<String>,
    pub unit: Option<String>,
    pub threshold: Option<f64>,
    pub lead_time: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ItemPayload {
    #[validate(required, length(equal = 21))]
    pub purchase_cost_center_uuid: Option<String>,
    #[validate(length(equal = 21))]
    pub sub_purchase_cost_center_uuid: Option<String>,
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "form::opt_i64")]
    pub index: Option<i64>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    pub vendor_price: Option<f64>,
    #[validate(custom(function = "date_time"))]
    pub price_validity: Option<String>,
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    pub threshold: Option<f64>,
    #[serde(default, deserialize_with = "form::opt_i64")]
    pub lead_time: Option<i64>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for Item {
    type Payload = ItemPayload;
    const NAME: &'static str = "item";
    const PATH: &'static str = "/procure/item";
    const TABLE: &'static Table = &ITEM_TABLE;

    fn defaults() -> Map<String, Value> {
        ["vendor_price", "threshold", "lead_time"]
            .into_iter()
            .map(|key| (key.to_string(), Value::from(0)))
            .collect()
    }
}

// --- Requisition ---

pub static REQUISITION_TABLE: Table = Table {
    name: "procure.requisition",
    select: r#"
        SELECT
            requisition.id,
            requisition.uuid,
            requisition.internal_cost_center_uuid,
            requisition.department,
            requisition.is_received,
            to_char(requisition.received_date, 'YYYY-MM-DD HH24:MI:SS') AS received_date,
            to_char(requisition.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(requisition.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            requisition.created_by,
            creator.name AS created_by_name,
            requisition.remarks
        FROM procure.requisition
        LEFT JOIN hr.users creator ON requisition.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("internal_cost_center_uuid"),
        Column::text("department"),
        Column::boolean("is_received"),
        Column::timestamp("received_date"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "uuid",
    order_by: Some(OrderBy {
        column: "created_at",
        direction: Direction::Desc,
    }),
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Requisition {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub internal_cost_center_uuid: String,
    pub department: String,
    pub is_received: Option<bool>,
    pub received_date: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RequisitionPayload {
    #[validate(required, length(equal = 21))]
    pub internal_cost_center_uuid: Option<String>,
    #[validate(required, length(min = 1))]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "form::opt_bool")]
    pub is_received: Option<bool>,
    #[validate(custom(function = "date_time"))]
    pub received_date: Option<String>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for Requisition {
    type Payload = RequisitionPayload;
    const NAME: &'static str = "requisition";
    const PATH: &'static str = "/procure/requisition";
    const TABLE: &'static Table = &REQUISITION_TABLE;

    fn list_filter(query: &HashMap<String, String>) -> ListFilter {
        let is_received = tri_state(query.get("is_received").map(String::as_str));
        ListFilter::default().flag("is_received", is_received)
    }
}

// --- Item work order ---

pub static ITEM_WORK_ORDER_TABLE: Table = Table {
    name: "procure.item_work_order",
    select: r#"
        SELECT
            iwo.id,
            iwo.uuid,
            concat('IWO', to_char(iwo.created_at, 'YY'), '-', lpad(iwo.id::text, 4, '0')) AS work_order_id,
            iwo.vendor_uuid,
            vendor.name AS vendor_name,
            iwo.bill_uuid,
            iwo.status,
            to_char(iwo.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(iwo.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            iwo.created_by,
            creator.name AS created_by_name,
            iwo.remarks
        FROM procure.item_work_order iwo
        LEFT JOIN procure.vendor ON iwo.vendor_uuid = vendor.uuid
        LEFT JOIN hr.users creator ON iwo.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("vendor_uuid"),
        Column::text("bill_uuid"),
        Column::boolean("status"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "work_order_id",
    order_by: Some(OrderBy {
        column: "created_at",
        direction: Direction::Desc,
    }),
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItemWorkOrder {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub work_order_id: Option<String>,
    pub vendor_uuid: String,
    pub vendor_name: Option<String>,
    pub bill_uuid: Option<String>,
    pub status: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ItemWorkOrderPayload {
    #[validate(required, length(equal = 21))]
    pub vendor_uuid: Option<String>,
    #[validate(length(equal = 21))]
    pub bill_uuid: Option<String>,
    #[serde(default, deserialize_with = "form::opt_bool")]
    pub status: Option<bool>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for ItemWorkOrder {
    type Payload = ItemWorkOrderPayload;
    const NAME: &'static str = "item work order";
    const PATH: &'static str = "/procure/item-work-order";
    const TABLE: &'static Table = &ITEM_WORK_ORDER_TABLE;

    /// `vendor_uuid` and `bill_uuid` match exactly; `is_bill=true` keeps billed orders,
    /// `false` keeps the unbilled ones.
    fn list_filter(query: &HashMap<String, String>) -> ListFilter {
        let filter = ListFilter::default()
            .eq_opt("vendor_uuid", query.get("vendor_uuid"))
            .eq_opt("bill_uuid", query.get("bill_uuid"));
        match tri_state(query.get("is_bill").map(String::as_str)) {
            Some(true) => filter.is_not_null("bill_uuid"),
            Some(false) => filter.is_null("bill_uuid"),
            None => filter,
        }
    }
}

impl ValueLabel for ItemWorkOrder {}

// --- Item work order entry ---

pub static ITEM_WORK_ORDER_ENTRY_TABLE: Table = Table {
    name: "procure.item_work_order_entry",
    select: r#"
        SELECT
            entry.id,
            entry.uuid,
            entry.item_work_order_uuid,
            entry.item_uuid,
            item.name AS item_name,
            entry.request_quantity::float8 AS request_quantity,
            entry.provided_quantity::float8 AS provided_quantity,
            entry.unit_price::float8 AS unit_price,
            entry."index",
            to_char(entry.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
            to_char(entry.updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at,
            entry.created_by,
            creator.name AS created_by_name,
            entry.remarks
        FROM procure.item_work_order_entry entry
        LEFT JOIN procure.item ON entry.item_uuid = item.uuid
        LEFT JOIN hr.users creator ON entry.created_by = creator.uuid
    "#,
    columns: &[
        Column::text("item_work_order_uuid"),
        Column::text("item_uuid"),
        Column::decimal("request_quantity"),
        Column::decimal("provided_quantity"),
        Column::decimal("unit_price"),
        Column::integer("index"),
        Column::timestamp("created_at"),
        Column::timestamp("updated_at"),
        Column::text("created_by"),
        Column::text("remarks"),
    ],
    label: "item_name",
    order_by: Some(OrderBy {
        column: "index",
        direction: Direction::Asc,
    }),
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItemWorkOrderEntry {
    #[serde(default)]
    pub id: i64,
    pub uuid: String,
    pub item_work_order_uuid: Option<String>,
    pub item_uuid: Option<String>,
    pub item_name: Option<String>,
    pub request_quantity: f64,
    pub provided_quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub index: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub created_by_name: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ItemWorkOrderEntryPayload {
    #[validate(length(equal = 21))]
    pub item_work_order_uuid: Option<String>,
    #[validate(length(equal = 21))]
    pub item_uuid: Option<String>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    #[validate(required, range(exclusive_min = 0.0))]
    pub request_quantity: Option<f64>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    #[validate(range(exclusive_min = 0.0))]
    pub provided_quantity: Option<f64>,
    #[serde(default, deserialize_with = "form::opt_f64")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "form::opt_i64")]
    pub index: Option<i64>,
    #[validate(required, custom(function = "date_time"))]
    pub created_at: Option<String>,
    #[validate(custom(function = "date_time"))]
    pub updated_at: Option<String>,
    #[validate(required, length(equal = 21))]
    pub created_by: Option<String>,
    pub remarks: Option<String>,
}

impl Resource for ItemWorkOrderEntry {
    type Payload = ItemWorkOrderEntryPayload;
    const NAME: &'static str = "item work order entry";
    const PATH: &'static str = "/procure/item-work-order-entry";
    const TABLE: &'static Table = &ITEM_WORK_ORDER_ENTRY_TABLE;

    fn list_filter(query: &HashMap<String, String>) -> ListFilter {
        ListFilter::default().eq_opt("item_work_order_uuid", query.get("item_work_order_uuid"))
    }

    fn defaults() -> Map<String, Value> {
        Map::from_iter([("unit_price".to_string(), Value::from(0))])
    }
}
