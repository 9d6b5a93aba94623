use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::fetch::retry;

#[derive(Debug, Deserialize)]
struct EthUsdResponse {
    ethereum: UsdQuote,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    usd: f64,
}

/// ETH/USD reference price from the configured HTTP feed.
pub async fn eth_usd_price(client: &reqwest::Client, feed_url: &str) -> Result<f64> {
    let resp = retry(3, || {
        let client = client.clone();
        let url = feed_url.to_string();
        async move {
            let r = client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json::<EthUsdResponse>()
                .await?;
            Ok(r)
        }
    })
    .await
    .context("fetching ETH/USD price")?;

    let price = resp.ethereum.usd;
    if !price.is_finite() || price <= 0.0 {
        bail!("ETH/USD feed returned a non-positive price: {price}");
    }
    Ok(price)
}
