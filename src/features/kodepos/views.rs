//! Page assembly: head metadata, breadcrumb trail, structured data and the
//! template payload for each kind of page.

use serde_json::{json, Value};

use crate::features::kodepos::dtos::{
    DistrictData, DistrictLink, Faq, HomeData, KodeposData, Link, NotFoundData, PlaceLink,
    ProvinceData, ProvinceIndexData, RegencyData, SearchData, VillageData, VillageLink,
};
use crate::features::kodepos::models::KodeposRecord;
use crate::features::kodepos::paths::{self, HOME_PATH, PROVINCE_INDEX_PATH, SEARCH_PATH};
use crate::features::kodepos::services::{
    DistrictDetail, KodeposDetail, ProvinceDetail, RegencyDetail, SearchResults, VillageDetail,
};
use crate::shared::types::{Breadcrumb, Page, PageMeta, SiteInfo};

const DEFAULT_DESCRIPTION: &str =
    "Cari kode pos kelurahan, kecamatan, kabupaten, dan provinsi di Indonesia. Data resmi dari BPS Indonesia.";
const DEFAULT_KEYWORDS: &str =
    "kode pos indonesia, postal code, kode pos, cari kode pos, bps indonesia";
const DATA_SOURCE: &str = "https://sig.bps.go.id/bridging-kode/index";

fn meta(site: &SiteInfo, title: String, description: String, path: &str) -> PageMeta {
    PageMeta {
        title,
        description,
        canonical: site.absolute(path),
        keywords: None,
    }
}

fn root_crumbs() -> Vec<Breadcrumb> {
    vec![
        Breadcrumb::new("Beranda", HOME_PATH),
        Breadcrumb::new("Provinsi", PROVINCE_INDEX_PATH),
    ]
}

/// Trail for a resolved prefix of the hierarchy
fn hierarchy_crumbs(names: &[&str]) -> Vec<Breadcrumb> {
    let mut crumbs = root_crumbs();
    let owned: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    for depth in 1..=owned.len() {
        crumbs.push(Breadcrumb::new(
            owned[depth - 1].clone(),
            paths::hierarchy_path(&owned[..depth]),
        ));
    }
    crumbs
}

fn item_list<'a>(site: &SiteInfo, items: impl IntoIterator<Item = (String, &'a str)>) -> Value {
    let elements: Vec<Value> = items
        .into_iter()
        .enumerate()
        .map(|(i, (name, path))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "url": site.absolute(path),
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "itemListElement": elements,
    })
}

fn breadcrumb_list(site: &SiteInfo, crumbs: &[Breadcrumb]) -> Value {
    let elements: Vec<Value> = crumbs
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": crumb.label,
                "item": site.absolute(&crumb.href),
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

pub fn home(site: &SiteInfo) -> Page<HomeData> {
    let mut meta = meta(
        site,
        format!("{} - Cari Kode Pos Seluruh Indonesia", SiteInfo::NAME),
        DEFAULT_DESCRIPTION.to_string(),
        HOME_PATH,
    );
    meta.keywords = Some(DEFAULT_KEYWORDS.to_string());

    let website = json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": SiteInfo::NAME,
        "url": site.absolute(HOME_PATH),
        "potentialAction": {
            "@type": "SearchAction",
            "target": format!("{}?q={{search_term_string}}", site.absolute(SEARCH_PATH)),
            "query-input": "required name=search_term_string",
        },
    });

    Page::new(
        meta,
        Vec::new(),
        HomeData {
            search_action: SEARCH_PATH,
            kodepos_action: "/kodepos",
            examples: vec![
                Link::new("Jelajahi Provinsi", PROVINCE_INDEX_PATH),
                Link::new("Contoh Kode Pos", paths::kodepos_path("23895")),
                Link::new("Cari \"purwodadi\"", paths::search_path("purwodadi")),
            ],
        },
    )
    .with_json_ld(&website)
}

pub fn province_index(site: &SiteInfo, provinces: Vec<String>) -> Page<ProvinceIndexData> {
    let provinces: Vec<Link> = provinces
        .into_iter()
        .map(|p| {
            let href = paths::province_path(&p);
            Link::new(p, href)
        })
        .collect();
    let list = item_list(
        site,
        provinces
            .iter()
            .map(|l| (format!("Provinsi {}", l.name), l.href.as_str())),
    );

    Page::new(
        meta(
            site,
            "Daftar Provinsi Indonesia".to_string(),
            "Jelajah provinsi untuk melihat daftar kabupaten dan kode pos.".to_string(),
            PROVINCE_INDEX_PATH,
        ),
        root_crumbs(),
        ProvinceIndexData { provinces },
    )
    .with_json_ld(&list)
}

pub fn province(site: &SiteInfo, detail: ProvinceDetail) -> Page<ProvinceData> {
    let path = paths::province_path(&detail.provinsi);
    let regencies: Vec<Link> = detail
        .regencies
        .iter()
        .map(|k| Link::new(k.clone(), paths::regency_path(&detail.provinsi, k)))
        .collect();
    let list = item_list(
        site,
        regencies
            .iter()
            .map(|l| (format!("Kabupaten {}", l.name), l.href.as_str())),
    );

    Page::new(
        meta(
            site,
            format!("Daftar Kabupaten di {}", detail.provinsi),
            format!(
                "Jelajah kabupaten di Provinsi {} untuk melihat kecamatan dan kode pos.",
                detail.provinsi
            ),
            &path,
        ),
        hierarchy_crumbs(&[&detail.provinsi]),
        ProvinceData {
            provinsi: detail.provinsi,
            regencies,
        },
    )
    .with_json_ld(&list)
}

pub fn regency(site: &SiteInfo, detail: RegencyDetail) -> Page<RegencyData> {
    let RegencyDetail {
        provinsi,
        kabupaten,
        districts,
        siblings,
        sibling_total,
    } = detail;

    let path = paths::regency_path(&provinsi, &kabupaten);
    let districts: Vec<Link> = districts
        .iter()
        .map(|kec| Link::new(kec.clone(), paths::district_path(&provinsi, &kabupaten, kec)))
        .collect();
    let more_siblings = sibling_total.saturating_sub(siblings.len());
    let siblings: Vec<Link> = siblings
        .iter()
        .map(|k| Link::new(k.clone(), paths::regency_path(&provinsi, k)))
        .collect();
    let list = item_list(
        site,
        districts
            .iter()
            .map(|l| (format!("Kecamatan {}", l.name), l.href.as_str())),
    );

    Page::new(
        meta(
            site,
            format!("Daftar Kode Pos Kabupaten {} - {}", kabupaten, provinsi),
            format!(
                "Daftar kecamatan dan kode pos di Kabupaten {}, Provinsi {}.",
                kabupaten, provinsi
            ),
            &path,
        ),
        hierarchy_crumbs(&[&provinsi, &kabupaten]),
        RegencyData {
            province_href: paths::province_path(&provinsi),
            provinsi,
            kabupaten,
            districts,
            siblings,
            more_siblings,
        },
    )
    .with_json_ld(&list)
}

pub fn district(site: &SiteInfo, detail: DistrictDetail) -> Page<DistrictData> {
    let DistrictDetail {
        provinsi,
        kabupaten,
        kecamatan,
        villages,
        unique_kodepos,
        siblings,
        sibling_total,
    } = detail;

    let path = paths::district_path(&provinsi, &kabupaten, &kecamatan);
    let villages: Vec<VillageLink> = villages
        .iter()
        .map(|v| VillageLink::new(&provinsi, &kabupaten, &kecamatan, v))
        .collect();
    let more_siblings = sibling_total.saturating_sub(siblings.len());
    let siblings: Vec<Link> = siblings
        .iter()
        .map(|kec| Link::new(kec.clone(), paths::district_path(&provinsi, &kabupaten, kec)))
        .collect();
    let list = item_list(
        site,
        villages.iter().map(|v| {
            (
                format!("Kelurahan {} - Kode Pos {}", v.name, v.kodepos),
                v.href.as_str(),
            )
        }),
    );

    Page::new(
        meta(
            site,
            format!(
                "Daftar Kode Pos Kecamatan {}, {} - {}",
                kecamatan, kabupaten, provinsi
            ),
            format!(
                "Daftar kelurahan dan kode pos di Kecamatan {}, Kabupaten {}, Provinsi {}.",
                kecamatan, kabupaten, provinsi
            ),
            &path,
        ),
        hierarchy_crumbs(&[&provinsi, &kabupaten, &kecamatan]),
        DistrictData {
            regency_href: paths::regency_path(&provinsi, &kabupaten),
            provinsi,
            kabupaten,
            kecamatan,
            villages,
            unique_kodepos,
            siblings,
            more_siblings,
        },
    )
    .with_json_ld(&list)
}

fn village_faqs(r: &KodeposRecord) -> Vec<Faq> {
    vec![
        Faq {
            question: format!("Berapa kode pos {}?", r.kelurahan),
            answer: format!(
                "Kode pos Kelurahan {}, Kecamatan {}, Kabupaten {}, Provinsi {} adalah {}.",
                r.kelurahan, r.kecamatan, r.kabupaten, r.provinsi, r.kodepos
            ),
        },
        Faq {
            question: format!("Dimana letak Kelurahan {}?", r.kelurahan),
            answer: format!(
                "Kelurahan {} terletak di Kecamatan {}, Kabupaten {}, Provinsi {}, Indonesia.",
                r.kelurahan, r.kecamatan, r.kabupaten, r.provinsi
            ),
        },
        Faq {
            question: "Apa itu kode pos?".to_string(),
            answer: "Kode pos adalah serangkaian angka yang ditambahkan pada alamat surat untuk mempermudah proses penyortiran dan pengiriman surat oleh kantor pos.".to_string(),
        },
        Faq {
            question: "Bagaimana cara menggunakan kode pos?".to_string(),
            answer: format!(
                "Kode pos ditulis di bagian akhir alamat, biasanya setelah nama kelurahan/desa dan kecamatan. Contoh: Kelurahan {}, Kec. {}, Kab. {}, {} {}.",
                r.kelurahan, r.kecamatan, r.kabupaten, r.provinsi, r.kodepos
            ),
        },
    ]
}

pub fn village(site: &SiteInfo, detail: VillageDetail) -> Page<VillageData> {
    let VillageDetail {
        record,
        siblings,
        shared,
    } = detail;

    let path = record.path();
    let crumbs = hierarchy_crumbs(&[
        &record.provinsi,
        &record.kabupaten,
        &record.kecamatan,
        &record.kelurahan,
    ]);
    let faqs = village_faqs(&record);

    let place = json!({
        "@context": "https://schema.org",
        "@type": "Place",
        "name": format!("{}, {}, {}", record.kelurahan, record.kecamatan, record.kabupaten),
        "url": site.absolute(&path),
        "address": {
            "@type": "PostalAddress",
            "addressLocality": record.kelurahan,
            "addressRegion": record.provinsi,
            "addressCountry": "ID",
            "postalCode": record.kodepos,
        },
        "isBasedOn": DATA_SOURCE,
    });
    let questions: Vec<Value> = faqs
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": { "@type": "Answer", "text": faq.answer },
            })
        })
        .collect();
    let faq_page = json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": questions,
    });

    let mut meta = meta(
        site,
        format!(
            "Kode Pos {} {} - {}, {}, {}",
            record.kelurahan, record.kodepos, record.kecamatan, record.kabupaten, record.provinsi
        ),
        format!(
            "Kode pos {} untuk Kelurahan {}, Kecamatan {}, Kabupaten {}, Provinsi {}. Data resmi dari BPS Indonesia.",
            record.kodepos, record.kelurahan, record.kecamatan, record.kabupaten, record.provinsi
        ),
        &path,
    );
    meta.keywords = Some(format!(
        "kode pos {}, kode pos {}, kode pos {}, {}, postal code indonesia",
        record.kelurahan, record.kecamatan, record.kabupaten, record.kodepos
    ));

    let breadcrumbs = breadcrumb_list(site, &crumbs);
    let siblings = siblings
        .iter()
        .map(|v| VillageLink::new(&record.provinsi, &record.kabupaten, &record.kecamatan, v))
        .collect();

    Page::new(
        meta,
        crumbs,
        VillageData {
            district_href: paths::district_path(
                &record.provinsi,
                &record.kabupaten,
                &record.kecamatan,
            ),
            kodepos_href: paths::kodepos_path(&record.kodepos),
            siblings,
            shared: shared.into_iter().map(PlaceLink::from).collect(),
            faqs,
            record,
        },
    )
    .with_json_ld(&place)
    .with_json_ld(&breadcrumbs)
    .with_json_ld(&faq_page)
}

pub fn kodepos(site: &SiteInfo, detail: KodeposDetail) -> Page<KodeposData> {
    let path = paths::kodepos_path(&detail.kodepos);
    let villages: Vec<PlaceLink> = detail.villages.into_iter().map(PlaceLink::from).collect();
    let list = item_list(
        site,
        villages.iter().map(|v| {
            (
                format!(
                    "Kelurahan {}, {}, {} - {}",
                    v.record.kelurahan, v.record.kecamatan, v.record.kabupaten, v.record.provinsi
                ),
                v.href.as_str(),
            )
        }),
    );

    let mut crumbs = vec![Breadcrumb::new("Beranda", HOME_PATH)];
    crumbs.push(Breadcrumb::new(format!("Kode Pos {}", detail.kodepos), path.clone()));

    Page::new(
        meta(
            site,
            format!("Kode Pos {}", detail.kodepos),
            format!(
                "Kelurahan yang menggunakan kode pos {} di Indonesia.",
                detail.kodepos
            ),
            &path,
        ),
        crumbs,
        KodeposData {
            kodepos: detail.kodepos,
            villages,
        },
    )
    .with_json_ld(&list)
}

pub fn search(site: &SiteInfo, results: SearchResults) -> Page<SearchData> {
    let SearchResults {
        term,
        villages,
        districts,
    } = results;

    let path = paths::search_path(&term);
    let (title, description) = if term.is_empty() {
        (
            "Pencarian Kode Pos - Kelurahan & Kecamatan".to_string(),
            "Cari kelurahan atau kecamatan untuk melihat kode pos terkait.".to_string(),
        )
    } else {
        (
            format!("Kode Pos {} - Kelurahan & Kecamatan Terkait", term),
            format!(
                "Hasil untuk \"{}\": kelurahan dan kecamatan terkait dengan kode posnya.",
                term
            ),
        )
    };

    let villages: Vec<PlaceLink> = villages.into_iter().map(PlaceLink::from).collect();
    let districts: Vec<DistrictLink> = districts.into_iter().map(DistrictLink::from).collect();

    let list = (!term.is_empty()).then(|| {
        let village_items = villages.iter().map(|v| {
            (
                format!(
                    "Kelurahan {}, {}, {} - {} (Kode Pos {})",
                    v.record.kelurahan,
                    v.record.kecamatan,
                    v.record.kabupaten,
                    v.record.provinsi,
                    v.record.kodepos
                ),
                v.href.as_str(),
            )
        });
        let district_items = districts.iter().map(|d| {
            (
                format!(
                    "Kecamatan {}, {} - {}",
                    d.district.kecamatan, d.district.kabupaten, d.district.provinsi
                ),
                d.href.as_str(),
            )
        });
        item_list(site, village_items.chain(district_items))
    });

    let page = Page::new(
        meta(site, title, description, &path),
        vec![
            Breadcrumb::new("Beranda", HOME_PATH),
            Breadcrumb::new("Pencarian", path.clone()),
        ],
        SearchData {
            term,
            villages,
            districts,
        },
    );

    match list {
        Some(list) => page.with_json_ld(&list),
        None => page,
    }
}

pub fn not_found(site: &SiteInfo, path: &str, message: impl Into<String>) -> Page<NotFoundData> {
    Page::new(
        meta(
            site,
            "Data tidak ditemukan".to_string(),
            DEFAULT_DESCRIPTION.to_string(),
            path,
        ),
        vec![Breadcrumb::new("Beranda", HOME_PATH)],
        NotFoundData {
            message: message.into(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::record;

    fn site() -> SiteInfo {
        SiteInfo::new("https://kodepos.online")
    }

    #[test]
    fn test_village_page_carries_three_json_ld_blocks() {
        let r = record("Aceh", "Kab. Aceh Besar", "Darul Imarah", "Lamreung", "23352");
        let page = village(
            &site(),
            VillageDetail {
                record: r.clone(),
                siblings: Vec::new(),
                shared: vec![r],
            },
        );

        assert_eq!(page.json_ld.len(), 3);
        assert!(page.json_ld[0].contains("\"@type\":\"Place\""));
        assert!(page.json_ld[1].contains("\"@type\":\"BreadcrumbList\""));
        assert!(page.json_ld[2].contains("\"@type\":\"FAQPage\""));
        assert_eq!(
            page.meta.canonical,
            "https://kodepos.online/provinsi/aceh/kabupaten/kab-aceh-besar/kecamatan/darul-imarah/kelurahan/lamreung"
        );
        assert_eq!(page.breadcrumbs.len(), 6);
        assert_eq!(page.breadcrumbs[2].label, "Aceh");
        assert_eq!(page.breadcrumbs[5].href, page.data.record.path());
    }

    #[test]
    fn test_regency_page_counts_hidden_siblings() {
        let page = regency(
            &site(),
            RegencyDetail {
                provinsi: "Aceh".into(),
                kabupaten: "Kab. Aceh Besar".into(),
                districts: vec!["Darul Imarah".into()],
                siblings: vec!["Kota Banda Aceh".into()],
                sibling_total: 5,
            },
        );

        assert_eq!(page.data.more_siblings, 4);
        assert_eq!(page.data.siblings[0].href, "/provinsi/aceh/kabupaten/kota-banda-aceh");
        assert_eq!(
            page.data.districts[0].href,
            "/provinsi/aceh/kabupaten/kab-aceh-besar/kecamatan/darul-imarah"
        );
    }

    #[test]
    fn test_empty_search_has_no_item_list() {
        let page = search(&site(), SearchResults::default());
        assert!(page.json_ld.is_empty());
        assert_eq!(page.meta.canonical, "https://kodepos.online/cari");
    }

    #[test]
    fn test_search_canonical_encodes_term() {
        let page = search(
            &site(),
            SearchResults {
                term: "suka maju".into(),
                ..Default::default()
            },
        );
        assert_eq!(page.meta.canonical, "https://kodepos.online/cari?q=suka%20maju");
        assert_eq!(page.json_ld.len(), 1);
    }
}
