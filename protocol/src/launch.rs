//! Launch URL for the remote verification surface.

use crate::ProtocolError;
use agegate_types::{AssetId, Metadata, ReferenceId, Theme};
use url::Url;

/// Replaced with the asset id when present in the service URL.
pub const ASSET_ID_PLACEHOLDER: &str = "{asset_id}";

/// Where the service sends the user in redirect mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: Option<String>,
    pub error_url: Option<String>,
    pub cancel_url: Option<String>,
}

impl RedirectUrls {
    pub fn is_empty(&self) -> bool {
        self.success_url.is_none() && self.error_url.is_none() && self.cancel_url.is_none()
    }
}

/// Everything carried by the launch URL.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchParams {
    pub asset_id: AssetId,
    pub reference_id: ReferenceId,
    pub theme: Theme,
    /// Already resolved; never `"auto"`.
    pub locale: String,
    pub protocol_version: u16,
    pub metadata: Option<Metadata>,
    pub redirects: RedirectUrls,
    /// `embedded` for modal launches, `redirect` for full-page navigation.
    pub mode: &'static str,
}

/// Build the URL the surface is opened at.
pub fn build_launch_url(service_url: &str, params: &LaunchParams) -> Result<Url, ProtocolError> {
    let templated = service_url.contains(ASSET_ID_PLACEHOLDER);
    let base = if templated {
        let encoded: String =
            url::form_urlencoded::byte_serialize(params.asset_id.as_str().as_bytes()).collect();
        service_url.replace(ASSET_ID_PLACEHOLDER, &encoded)
    } else {
        service_url.to_string()
    };

    let mut url = Url::parse(&base).map_err(|e| ProtocolError::InvalidUrl(e.to_string()))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("reference_id", params.reference_id.as_str());
        if !templated {
            query.append_pair("asset_id", params.asset_id.as_str());
        }
        query.append_pair("theme", params.theme.as_str());
        query.append_pair("locale", &params.locale);
        query.append_pair("mode", params.mode);
        query.append_pair("protocol_version", &params.protocol_version.to_string());
        if let Some(u) = &params.redirects.error_url {
            query.append_pair("error_url", u);
        }
        if let Some(u) = &params.redirects.success_url {
            query.append_pair("success_url", u);
        }
        if let Some(u) = &params.redirects.cancel_url {
            query.append_pair("cancel_url", u);
        }
        if let Some(metadata) = &params.metadata {
            query.append_pair("metadata", &metadata.to_json());
        }
    }
    Ok(url)
}
