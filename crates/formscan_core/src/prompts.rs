//! crates/formscan_core/src/prompts.rs
//!
//! Built-in extraction prompt templates and the per-user override store.
//!
//! The default templates embed the customers' extraction rules (including the
//! company-specific invoice aggregation rules) and the required output schema.
//! They are fixed data, not derived at runtime.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Default instructions for 請求書 (invoice) extraction.
pub const DEFAULT_INVOICE_PROMPT: &str = r#"この画像を「請求書」として読み取り、以下の情報を JSON 形式のリストで出力してください。
ページ内に複数の請求書がある場合や、複数ページの場合は、すべてリスト化してください。

【重要：会社ごとの特殊ルール（最優先）】
1. **「株式会社グラフィッククリエーション」の場合：**
   - 「今回発生額（current_billing_amount）」には、明細行にある「税抜御買上額」と「消費税額等」を足した合計値を入れてください。（※一番右の「今回御請求額」ではありません）

2. **「戸田工業株式会社」の場合：**
   - 「今回発生額（current_billing_amount）」には、「今回お買上高」欄の中にある「合計金額」を入れてください。（※右端の「今回ご請求高」ではありません）

3. **その他の会社（基本ルール）：**
   - 「前回請求額」 - 「入金額」 = 「繰越額」 の関係が成り立つ場所を探してください。
   - 「今回発生額（current_billing_amount）」は、今回新しく発生した「合計請求金額（税込）」または「今回売上高」を抽出してください。
   - 都度払い（スポット）で前回額などの記載がない場合は、0 または null にしてください。

【出力項目】
Markdown 記法は禁止。純粋な JSON テキストのみ出力すること。
ルート要素は "invoices" という配列にする。

{
  "invoices": [
    {
      "supplier": "請求元の会社名",
      "issue_date": "請求書発行日（YYYY/MM/DD 形式、なければ null）",
      "closing_date": "締日（YYYY/MM/DD 形式、なければ null）",
      "previous_balance": "前回請求額（数値のみ、なければ 0）",
      "payment_amount": "入金額（数値のみ、なければ 0）",
      "carried_over_amount": "繰越額（数値のみ、なければ 0）",
      "current_billing_amount": "今回発生額（ルールに基づいて抽出）"
    }
  ]
}"#;

/// Default instructions for 納品書 (delivery note) extraction.
pub const DEFAULT_DELIVERY_PROMPT: &str = r#"以下のPDF画像は納品書です。以下の情報を抽出してJSON形式で出力してください：
- 納品書番号
- 納品日
- 納品元（会社名、住所、電話番号）
- 納品先（会社名、住所）
- 明細（品名、数量、単価、金額）のリスト
- 合計金額
- 備考

出力形式:
```json
{
  "delivery_number": "",
  "delivery_date": "",
  "vendor": {"name": "", "address": "", "phone": ""},
  "client": {"name": "", "address": ""},
  "items": [{"name": "", "quantity": 0, "unit_price": 0, "amount": 0}],
  "total": 0,
  "remarks": ""
}
```"#;

/// Returns the built-in default prompt for a document type, if one exists.
pub fn default_prompt(document_type: &str) -> Option<&'static str> {
    match document_type {
        "invoice" => Some(DEFAULT_INVOICE_PROMPT),
        "delivery" => Some(DEFAULT_DELIVERY_PROMPT),
        _ => None,
    }
}

/// In-memory store of per-(user, document type) prompt overrides.
///
/// At most one override exists per pair; `set` is last-write-wins. Overrides
/// live for the lifetime of the process only. The map is guarded by an
/// internal lock so concurrent requests may read and write it freely.
#[derive(Debug, Default)]
pub struct PromptStore {
    overrides: RwLock<HashMap<(String, String), String>>,
}

impl PromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored override for this user and document type, if any.
    pub fn override_for(&self, uid: &str, document_type: &str) -> Option<String> {
        self.overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(uid.to_string(), document_type.to_string()))
            .cloned()
    }

    /// Returns the effective prompt: the override if present, else the
    /// built-in default, else `None` for an unknown document type.
    pub fn effective(&self, uid: &str, document_type: &str) -> Option<String> {
        self.override_for(uid, document_type)
            .or_else(|| default_prompt(document_type).map(str::to_string))
    }

    /// Unconditionally replaces any existing override for this pair.
    pub fn set(&self, uid: &str, document_type: &str, prompt: &str) {
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                (uid.to_string(), document_type.to_string()),
                prompt.to_string(),
            );
    }

    /// Removes the override for this pair. A no-op when none is stored.
    pub fn reset(&self, uid: &str, document_type: &str) {
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(uid.to_string(), document_type.to_string()));
    }

    /// True iff an override is currently stored for this pair.
    pub fn is_custom(&self, uid: &str, document_type: &str) -> bool {
        self.overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&(uid.to_string(), document_type.to_string()))
    }
}
