// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Static content catalog for the featured profile.
//!
//! Media lives on an external image host; only URLs are kept here. Plan
//! checkout links come from configuration.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::PaymentLinks;

const PHOTO_URLS: &[&str] = &[
    "https://imgur.com/cQyrZ0C.jpeg", "https://imgur.com/4qqmR6y.jpeg", "https://imgur.com/x3ixO77.jpeg",
    "https://imgur.com/DhRJWeo.jpeg", "https://imgur.com/R6IHUbv.jpeg", "https://imgur.com/7Ba5TDZ.jpeg",
    "https://imgur.com/AbtcymH.jpeg", "https://imgur.com/SjTHtIg.jpeg", "https://imgur.com/fI2KgWQ.jpeg",
    "https://imgur.com/qqeoh7D.jpeg", "https://imgur.com/nkF3djB.jpeg", "https://imgur.com/cqsZgum.jpeg",
    "https://imgur.com/DLX2fqO.jpeg", "https://imgur.com/jQKKv9L.jpeg", "https://imgur.com/ISRj8Tw.jpeg",
    "https://imgur.com/PrIwXea.jpeg", "https://imgur.com/ks5MxtR.jpeg", "https://imgur.com/DlVJrB5.jpeg",
    "https://imgur.com/qzXIwdN.jpeg", "https://imgur.com/20IJ8Ww.jpeg", "https://imgur.com/i7kjDS1.jpeg",
    "https://imgur.com/5Ysodbo.jpeg", "https://imgur.com/mXSjdpb.jpeg", "https://imgur.com/cJ4bSlO.jpeg",
    "https://imgur.com/1iaOJXA.jpeg", "https://imgur.com/CUayEQa.jpeg", "https://imgur.com/lib0M69.jpeg",
    "https://imgur.com/FrZGgR5.jpeg", "https://imgur.com/zITfYaP.jpeg", "https://imgur.com/6fzLuzO.jpeg",
    "https://imgur.com/AUglX5n.jpeg", "https://imgur.com/BkIjaN1.jpeg", "https://imgur.com/a80At0v.jpeg",
    "https://imgur.com/NWLcgD8.jpeg", "https://imgur.com/zLrJjY6.jpeg", "https://imgur.com/v6QBwWZ.jpeg",
    "https://imgur.com/F3vTTvD.jpeg", "https://imgur.com/cHItk1i.jpeg", "https://imgur.com/4KrKuwn.jpeg",
    "https://imgur.com/LD60NNT.jpeg", "https://imgur.com/sdYzdTT.jpeg", "https://imgur.com/zVSSUlE.jpeg",
    "https://imgur.com/SqgRAjy.jpeg", "https://imgur.com/kv4JYgY.jpeg", "https://imgur.com/I2W22ct.jpeg",
    "https://imgur.com/VLDmmOb.jpeg", "https://imgur.com/XJIISUR.jpeg", "https://imgur.com/z9brvSK.jpeg",
    "https://imgur.com/q8VSlJS.jpeg", "https://imgur.com/4MgDvT3.jpeg", "https://imgur.com/9ISbk9c.jpeg",
    "https://imgur.com/4jqr1Hs.jpeg",
];

/// Video IDs on the image host; `.mp4` is the clip and `.jpeg` its poster.
const VIDEO_IDS: &[&str] = &[
    "5aQcNxC", "FtqlSjE", "hYBO3Tc", "KYuBB3L", "I0bj21v", "tJsiuSK", "QhVLxjA", "hDuogvW",
    "WQm1Aic", "VlneEoh", "8yU3iRE", "7FImUoW", "PZSiU0z", "Elx61bq", "qnFXjmc", "hZNMe94",
];

/// Free preview gallery: `(url, poster)`; a poster marks a video.
const PREVIEWS: &[(&str, Option<&str>)] = &[
    ("https://imgur.com/vqrsIvS.jpeg", None),
    ("https://imgur.com/uinrBJ4.jpeg", None),
    ("https://i.imgur.com/SDWrcl3.mp4", Some("https://i.imgur.com/SDWrcl3.jpeg")),
    ("https://imgur.com/uC66pAK.jpeg", None),
    ("https://i.imgur.com/FpUhVzf.mp4", Some("https://i.imgur.com/FpUhVzf.jpeg")),
    ("https://imgur.com/waOCybc.jpeg", None),
    ("https://imgur.com/vxKQ73i.jpeg", None),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A photo, video or preview tile.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub kind: MediaKind,
    pub url: String,
    pub thumbnail_url: String,
    pub width: u32,
    pub height: u32,
}

/// A purchasable plan.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in centavos (BRL)
    pub price_cents: u32,
    /// Price formatted for display, e.g. "14,90"
    pub price: String,
    pub payment_url: Option<String>,
    pub tags: Vec<&'static str>,
    pub is_featured: bool,
}

impl Plan {
    fn new(
        id: &'static str,
        name: &'static str,
        price_cents: u32,
        payment_url: Option<String>,
        tags: Vec<&'static str>,
    ) -> Self {
        Self {
            id,
            name,
            price_cents,
            price: format_brl(price_cents),
            payment_url,
            tags,
            is_featured: false,
        }
    }
}

/// Format centavos with a decimal comma ("1490" -> "14,90").
pub fn format_brl(cents: u32) -> String {
    format!("{},{:02}", cents / 100, cents % 100)
}

/// Headline counters displayed on the profile.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct ProfileStats {
    pub posts: u32,
    pub videos: u32,
    pub likes: u32,
    pub previews: u32,
    pub photos: u32,
}

/// Public profile of the featured model.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: &'static str,
    pub handle: &'static str,
    pub is_verified: bool,
    pub avatar_url: &'static str,
    pub banner_url: &'static str,
    pub bio: &'static str,
    pub instagram_url: &'static str,
    pub stats: ProfileStats,
}

/// Plans split the way the landing page shows them.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanCatalog {
    pub subscriptions: Vec<Plan>,
    pub promotions: Vec<Plan>,
}

pub fn profile() -> Profile {
    Profile {
        name: "Luna Rouge",
        handle: "luna__vipp",
        is_verified: true,
        avatar_url: "https://i.imgur.com/Xwd7qSZ.jpeg",
        banner_url: "https://imgur.com/2lTvoZw.jpeg",
        bio: "Oi, meu amor! Sou a Luna. Aqui você encontra meu conteúdo exclusivo, \
              fotos e vídeos que não publico em nenhum outro lugar. Assine e venha me conhecer.",
        instagram_url: "https://www.instagram.com/luna__vipp",
        stats: ProfileStats {
            posts: 121,
            videos: 267,
            likes: 265_800,
            previews: PREVIEWS.len() as u32,
            photos: 378,
        },
    }
}

pub fn plans(links: &PaymentLinks) -> PlanCatalog {
    let mut monthly = Plan::new("monthly", "30 Dias", 1490, links.monthly.clone(), vec![]);
    monthly.is_featured = true;

    PlanCatalog {
        subscriptions: vec![monthly],
        promotions: vec![
            Plan::new(
                "quarterly",
                "3 MESES",
                1990,
                links.quarterly.clone(),
                vec!["Mais popular"],
            ),
            Plan::new(
                "annual",
                "1 ANO",
                4990,
                links.annual.clone(),
                vec!["Melhor oferta"],
            ),
            Plan::new(
                "lifetime",
                "VITALÍCIO",
                8990,
                links.lifetime.clone(),
                vec!["Exclusivo"],
            ),
        ],
    }
}

pub fn previews() -> Vec<MediaItem> {
    PREVIEWS
        .iter()
        .enumerate()
        .map(|(i, (url, poster))| MediaItem {
            id: format!("gallery-preview-{}", i + 1),
            kind: if poster.is_some() {
                MediaKind::Video
            } else {
                MediaKind::Image
            },
            url: url.to_string(),
            thumbnail_url: poster.unwrap_or(url).to_string(),
            width: 600,
            height: 600,
        })
        .collect()
}

pub fn photos() -> Vec<MediaItem> {
    PHOTO_URLS
        .iter()
        .enumerate()
        .map(|(i, url)| MediaItem {
            id: format!("photo-{}", i + 1),
            kind: MediaKind::Image,
            url: url.to_string(),
            thumbnail_url: url.to_string(),
            width: 600,
            height: 800,
        })
        .collect()
}

pub fn videos() -> Vec<MediaItem> {
    VIDEO_IDS
        .iter()
        .enumerate()
        .map(|(i, id)| MediaItem {
            id: format!("video-{}", i + 1),
            kind: MediaKind::Video,
            url: format!("https://imgur.com/{}.mp4", id),
            thumbnail_url: format!("https://imgur.com/{}.jpeg", id),
            width: 600,
            height: 800,
        })
        .collect()
}

pub fn photo_count() -> usize {
    PHOTO_URLS.len()
}

pub fn video_count() -> usize {
    VIDEO_IDS.len()
}
