// ABOUTME: Parses a website profile page into a WebsiteProfile record.
// ABOUTME: Prefers the embedded __APP_DATA__ payload and falls back to rendered DOM nodes.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html};
use serde::Deserialize;

use crate::app_data::extract_app_data;
use crate::dom::{select_all, select_text, select_texts};
use crate::domain::normalize_domain;
use crate::error::ParseError;
use crate::models::{CountryShare, WebsiteProfile};
use crate::numbers::{
    decode_count, decode_duration, decode_percent, decode_plain, decode_rank, RawValue,
};

/// Per-site payload as embedded in profile and comparison pages.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SiteData {
    pub domain: Option<String>,
    pub overview: Option<Overview>,
    pub traffic: Option<Traffic>,
    pub traffic_sources: Option<TrafficSources>,
    pub geography: Option<Geography>,
    pub keywords: Option<Keywords>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Overview {
    pub global_rank: Option<RawValue>,
    pub country_rank: Option<RawValue>,
    pub country_alpha2_code: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Traffic {
    pub visits_total_count: Option<RawValue>,
    pub bounce_rate: Option<RawValue>,
    pub pages_per_visit: Option<RawValue>,
    pub visits_avg_duration_formatted: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrafficSources {
    pub direct_visits_share: Option<RawValue>,
    pub referral_visits_share: Option<RawValue>,
    pub organic_search_visits_share: Option<RawValue>,
    pub paid_search_visits_share: Option<RawValue>,
    pub social_networks_visits_share: Option<RawValue>,
    pub mail_visits_share: Option<RawValue>,
    pub ad_visits_share: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Geography {
    pub top_countries_traffics: Option<Vec<CountryTraffic>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CountryTraffic {
    pub country_alpha2_code: Option<String>,
    pub visits_share: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Keywords {
    pub top_keywords: Option<Vec<Keyword>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Keyword {
    pub name: Option<String>,
}

/// Parses the HTML of a single-domain profile page.
///
/// # Errors
/// * `ParseError::Empty` - the document is blank
/// * `ParseError::MissingData` - neither the embedded payload nor the overview title is present
/// * `ParseError::Json` / `ParseError::Field` - data is present but fails decoding
pub fn parse_profile(html: &str) -> Result<WebsiteProfile, ParseError> {
    if html.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let doc = Html::parse_document(html);
    match extract_app_data::<SiteData>(&doc)? {
        Some(site) => build_profile(site),
        None => parse_profile_dom(doc.root_element()),
    }
}

/// Builds a record from one decoded site payload.
pub(crate) fn build_profile(site: SiteData) -> Result<WebsiteProfile, ParseError> {
    let domain = site
        .domain
        .as_deref()
        .map(normalize_domain)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ParseError::missing("domain"))?;

    let overview = site.overview.unwrap_or_default();
    let traffic = site.traffic.unwrap_or_default();
    let sources = site.traffic_sources.unwrap_or_default();

    let channels = [
        ("direct", sources.direct_visits_share.as_ref()),
        ("referrals", sources.referral_visits_share.as_ref()),
        ("search", sources.organic_search_visits_share.as_ref()),
        ("paid_search", sources.paid_search_visits_share.as_ref()),
        ("social", sources.social_networks_visits_share.as_ref()),
        ("mail", sources.mail_visits_share.as_ref()),
        ("display", sources.ad_visits_share.as_ref()),
    ];
    let mut traffic_sources = BTreeMap::new();
    for (channel, raw) in channels {
        if let Some(pct) = decode_percent(channel, raw)? {
            traffic_sources.insert(channel.to_string(), pct);
        }
    }

    let mut top_countries = Vec::new();
    for entry in site
        .geography
        .and_then(|g| g.top_countries_traffics)
        .unwrap_or_default()
    {
        let Some(country) = entry.country_alpha2_code.filter(|c| !c.trim().is_empty()) else {
            continue;
        };
        // A country without a share is not part of the breakdown.
        let Some(share) = decode_percent("visitsShare", entry.visits_share.as_ref())? else {
            continue;
        };
        top_countries.push(CountryShare {
            country: country.trim().to_string(),
            share,
        });
    }

    let top_keywords = site
        .keywords
        .and_then(|k| k.top_keywords)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|k| k.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    Ok(WebsiteProfile {
        domain,
        global_rank: decode_rank("globalRank", overview.global_rank.as_ref())?,
        country_rank: decode_rank("countryRank", overview.country_rank.as_ref())?,
        country: overview.country_alpha2_code.filter(|c| !c.is_empty()),
        category: overview.category.filter(|c| !c.is_empty()),
        monthly_visits: decode_count("visitsTotalCount", traffic.visits_total_count.as_ref())?,
        bounce_rate: decode_percent("bounceRate", traffic.bounce_rate.as_ref())?,
        pages_per_visit: decode_plain("pagesPerVisit", traffic.pages_per_visit.as_ref())?,
        avg_visit_duration: decode_duration(
            "visitsAvgDurationFormatted",
            traffic.visits_avg_duration_formatted.as_ref(),
        )?,
        traffic_sources,
        top_countries,
        top_keywords,
    })
}

/// Reads the rendered overview widgets when no embedded payload exists.
fn parse_profile_dom(root: ElementRef<'_>) -> Result<WebsiteProfile, ParseError> {
    let domain = select_text(root, ".wa-overview__title")
        .map(|d| normalize_domain(&d))
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ParseError::missing("__APP_DATA__ script or .wa-overview__title"))?;

    let text_value = |css: &str| select_text(root, css).map(RawValue::Text);

    let mut profile = WebsiteProfile {
        domain,
        global_rank: decode_rank(
            "globalRank",
            text_value(".wa-rank-list__item--global .wa-rank-list__value").as_ref(),
        )?,
        country_rank: decode_rank(
            "countryRank",
            text_value(".wa-rank-list__item--country .wa-rank-list__value").as_ref(),
        )?,
        country: select_text(root, ".wa-rank-list__item--country .wa-rank-list__info-capitalize"),
        category: select_text(root, ".wa-rank-list__item--category .wa-rank-list__info-link"),
        ..Default::default()
    };

    for item in select_all(root, ".engagement-list__item") {
        let (Some(name), Some(value)) = (
            select_text(item, ".engagement-list__item-name"),
            select_text(item, ".engagement-list__item-value"),
        ) else {
            continue;
        };
        let raw = RawValue::Text(value);
        match name.to_lowercase().as_str() {
            "total visits" => profile.monthly_visits = decode_count(&name, Some(&raw))?,
            "bounce rate" => profile.bounce_rate = decode_percent(&name, Some(&raw))?,
            "pages per visit" => profile.pages_per_visit = decode_plain(&name, Some(&raw))?,
            "avg visit duration" => profile.avg_visit_duration = decode_duration(&name, Some(&raw))?,
            _ => {}
        }
    }

    for row in select_all(root, ".wa-geography__country") {
        let Some(country) = select_text(row, ".wa-geography__country-name") else {
            continue;
        };
        let Some(share) = decode_percent(
            "countryShare",
            select_text(row, ".wa-geography__country-traffic-value")
                .map(RawValue::Text)
                .as_ref(),
        )?
        else {
            continue;
        };
        profile.top_countries.push(CountryShare { country, share });
    }

    profile.top_keywords = select_texts(root, ".wa-keywords__keyword");

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_domain_in_payload_is_an_error() {
        let html = r#"<script>window.__APP_DATA__ = {"layout":{"data":{"overview":{"globalRank":3}}}};</script>"#;
        assert!(matches!(
            parse_profile(html),
            Err(ParseError::MissingData(ref what)) if what == "domain"
        ));
    }

    #[test]
    fn null_sections_are_treated_as_absent() {
        let html = r#"<script>window.__APP_DATA__ = {"layout":{"data":{
            "domain":"www.Example.com","overview":null,"traffic":null,"trafficSources":null}}};</script>"#;
        let profile = parse_profile(html).unwrap();
        assert_eq!(profile.domain, "example.com");
        assert_eq!(profile.global_rank, None);
        assert!(profile.traffic_sources.is_empty());
    }

    #[test]
    fn undecodable_metric_is_not_masked() {
        let html = r#"<script>window.__APP_DATA__ = {"layout":{"data":{
            "domain":"a.com","traffic":{"bounceRate":"lots"}}}};</script>"#;
        assert!(matches!(parse_profile(html), Err(ParseError::Field { .. })));
    }

    #[test]
    fn country_without_share_is_skipped() {
        let html = r#"<script>window.__APP_DATA__ = {"layout":{"data":{"domain":"a.com",
            "geography":{"topCountriesTraffics":[
                {"countryAlpha2Code":"US"},
                {"countryAlpha2Code":"DE","visitsShare":0.125}]}}}};</script>"#;
        let profile = parse_profile(html).unwrap();
        assert_eq!(
            profile.top_countries,
            vec![CountryShare {
                country: "DE".to_string(),
                share: 12.5
            }]
        );
    }

    #[test]
    fn dom_percentages_without_sign_are_not_scaled() {
        let html = r#"<html><body>
            <p class="wa-overview__title">a.com</p>
            <div class="engagement-list__item">
              <p class="engagement-list__item-name">Bounce Rate</p>
              <p class="engagement-list__item-value">45</p>
            </div>
            <div class="wa-geography__country">
              <span class="wa-geography__country-name">France</span>
            </div>
        </body></html>"#;
        let profile = parse_profile(html).unwrap();
        assert_eq!(profile.bounce_rate, Some(45.0));
        assert!(profile.top_countries.is_empty());
    }

    #[test]
    fn blank_input_is_empty_error() {
        assert!(matches!(parse_profile("  \n"), Err(ParseError::Empty)));
    }
}
