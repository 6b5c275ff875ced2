use super::rule_store::FeeRuleStore;
use crate::config::Config;
use crate::domain::calculator::{compute_fee, format_amount};
use crate::domain::cart::{CartEstimate, CheckoutSession};
use crate::domain::fee_rule::FeeRuleSet;
use crate::error::Result;
use regex::{NoExpand, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Client-area action on which the estimate is rendered.
pub const CHECKOUT_ACTION: &str = "checkout";
/// DOM id of the element the estimate is written into.
pub const ESTIMATE_ELEMENT_ID: &str = "gateway_fees";

static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.,]+").expect("amount pattern is valid"));

const SCRIPT_TEMPLATE: &str = r#"<script>
(function(){
    var estimates = __ESTIMATES__;
    var label = __LABEL__;
    var elementId = __ELEMENT_ID__;
    function updateGatewayFees(){
        var sel = document.querySelector('input[name="paymentmethod"]:checked');
        var feeEl = document.getElementById(elementId);
        if(!feeEl) return;
        var feeStr = '';
        if(sel && Object.prototype.hasOwnProperty.call(estimates, sel.value)){
            feeStr = estimates[sel.value];
        }
        feeEl.textContent = feeStr ? (' + (' + label + ' ' + feeStr + ')') : '';
    }
    function ensureLabel(){
        if(document.getElementById(elementId)) return;
        var small = document.createElement('small');
        small.id = elementId;
        var targets = [
            document.getElementById('totalDueToday'),
            document.querySelector('.alert-success'),
            document.querySelector('.total > .text-center')
        ];
        for (var i=0;i<targets.length;i++){
            if(targets[i]){
                targets[i].appendChild(small);
                break;
            }
        }
    }
    document.addEventListener('change', function(e){
        if(e.target && e.target.name === 'paymentmethod'){ updateGatewayFees(); }
    });
    document.addEventListener('DOMContentLoaded', function(){
        ensureLabel();
        updateGatewayFees();
    });
})();
</script>"#;

/// Display-only fee estimates for the checkout page. Never writes to an invoice.
pub struct CheckoutEstimator {
    rules: FeeRuleStore,
    description_prefix: String,
}

impl CheckoutEstimator {
    pub fn new(rules: FeeRuleStore, config: &Config) -> Self {
        Self {
            rules,
            description_prefix: config.description_prefix.clone(),
        }
    }

    /// Estimated fee per configured gateway for the session's cart, if any.
    pub async fn estimates(
        &self,
        session: &CheckoutSession,
    ) -> Result<Option<BTreeMap<String, String>>> {
        let Some(cart) = session.cart_totals() else {
            return Ok(None);
        };
        let rules = self.rules.list_rules().await?;
        estimate_table(&rules, cart).map(Some)
    }

    /// Markup injected into the client-area footer.
    ///
    /// Empty unless `action` is the checkout page and a cart snapshot exists.
    pub async fn render(&self, session: &CheckoutSession, action: &str) -> Result<String> {
        if action != CHECKOUT_ACTION {
            return Ok(String::new());
        }
        match self.estimates(session).await? {
            Some(table) => render_script(&table, &self.description_prefix),
            None => Ok(String::new()),
        }
    }
}

/// Maps every gateway in `rules` to its estimate, formatted like the cart's display total.
pub fn estimate_table(
    rules: &FeeRuleSet,
    cart: &CartEstimate,
) -> Result<BTreeMap<String, String>> {
    rules
        .iter()
        .map(|(gateway, rule)| {
            let fee = compute_fee(cart.numeric_total, rule)?;
            let estimate = format_like(&cart.display_total, &format_amount(fee));
            Ok((gateway.to_string(), estimate))
        })
        .collect()
}

/// Replaces every numeric run in `display` with `amount`, keeping currency decoration.
///
/// `format_like("$100.00 USD", "10.00")` yields `$10.00 USD`; an empty display yields `amount`.
pub fn format_like(display: &str, amount: &str) -> String {
    if display.is_empty() {
        return amount.to_string();
    }
    AMOUNT_PATTERN
        .replace_all(display, NoExpand(amount))
        .into_owned()
}

fn render_script(table: &BTreeMap<String, String>, label: &str) -> Result<String> {
    Ok(SCRIPT_TEMPLATE
        .replace("__ESTIMATES__", &script_json(table)?)
        .replace("__LABEL__", &script_json(&label)?)
        .replace("__ELEMENT_ID__", &script_json(&ESTIMATE_ELEMENT_ID)?))
}

// JSON embedded in a <script> block must not close the tag early.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
