//! Products 数据模型

use serde::{Deserialize, Serialize};

/// `Products` 表的一行，JSON 字段名与列名一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct Product {
    pub product_id: i32,
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// 创建请求体，缺失字段原样作为 NULL 交给数据库
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProductResponse {
    pub success: bool,
}
