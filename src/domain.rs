// ドメイン層
// 在庫・生産・注文のビジネスルールを表現する

pub mod error;
pub mod model;
pub mod port;
pub mod service;
