//! Initial content for newly created plan documents.

use crate::codec::decode;
use crate::model::PlanDocument;

/// Twelve-month sample plan with two themes, two members and two rows.
pub const TEMPLATE: &str = r#"---
period: "2026/4-2027/3"
months:
  - "2026/4"
  - "2026/5"
  - "2026/6"
  - "2026/7"
  - "2026/8"
  - "2026/9"
  - "2026/10"
  - "2026/11"
  - "2026/12"
  - "2027/1"
  - "2027/2"
  - "2027/3"
themes:
  - name: "AEOシステム EKS verup対応"
    description: "サンプルテーマ"
  - name: "BCQシステム 新規構築"
    description: "サンプルテーマ2"
members:
  - name: "田中"
    description: "リーダー"
    price: 3000
  - name: "山田"
    description: "メンバー"
    price: 2000
totals: {}
---
"Member","Theme","2026/4","2026/5","2026/6","2026/7","2026/8","2026/9","2026/10","2026/11","2026/12","2027/1","2027/2","2027/3"
"田中","AEOシステム EKS verup対応",0.20,0.20,0,0,0,0,0,0,0,0,0,0
"田中","BCQシステム 新規構築",0.10,0.10,0,0,0,0,0,0,0,0,0,0
"#;

/// Decoded template document.
pub fn template_document() -> PlanDocument {
    decode(TEMPLATE)
}
