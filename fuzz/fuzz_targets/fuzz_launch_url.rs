#![no_main]

use agegate_protocol::{build_launch_url, LaunchParams, RedirectUrls};
use agegate_types::{AssetId, ReferenceId, Theme};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    service_url: String,
    asset_id: String,
    reference_id: String,
    locale: String,
    success_url: Option<String>,
}

fuzz_target!(|input: Input| {
    let (Ok(asset_id), Ok(reference_id)) = (
        AssetId::new(input.asset_id),
        ReferenceId::new(input.reference_id.clone()),
    ) else {
        return;
    };
    let params = LaunchParams {
        asset_id,
        reference_id,
        theme: Theme::Auto,
        locale: input.locale,
        protocol_version: 1,
        metadata: None,
        redirects: RedirectUrls {
            success_url: input.success_url,
            ..RedirectUrls::default()
        },
        mode: "embedded",
    };

    // The reference id always survives query encoding intact.
    if let Ok(url) = build_launch_url(&input.service_url, &params) {
        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "reference_id" && v == input.reference_id.as_str()));
    }
});
