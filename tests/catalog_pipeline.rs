//! End-to-end pipeline test: scan a folder tree, publish, search, sync.

use std::fs;
use std::path::PathBuf;

use tempfile::{tempdir, TempDir};

use fahrplanportal::parser::LineMapping;
use fahrplanportal::repository::{FahrplanRepository, OptionsRepository, OPTION_LINE_MAPPING};
use fahrplanportal::scan::{process_chunk, start_session, ScanContext};
use fahrplanportal::tags::ExclusionList;

struct Fixture {
    _dir: TempDir,
    base: PathBuf,
    repo: FahrplanRepository,
    options: OptionsRepository,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let base = dir.path().join("pdfs");
    let pdf = base.join("2025/kaernten/100-villach-klagenfurt.pdf");
    fs::create_dir_all(pdf.parent().unwrap()).unwrap();
    fs::write(&pdf, b"%PDF-1.4 stub").unwrap();

    let db_path = dir.path().join("catalog.db");
    let repo = FahrplanRepository::new(&db_path).unwrap();
    let options = OptionsRepository::new(&db_path).unwrap();
    options.set(OPTION_LINE_MAPPING, "100:5000").unwrap();

    Fixture {
        _dir: dir,
        base,
        repo,
        options,
    }
}

fn scan_all(fixture: &Fixture) -> (u64, u64) {
    let mapping = LineMapping::parse(&fixture.options.line_mapping().unwrap());
    let exclusion = ExclusionList::parse(&fixture.options.exclusion_words().unwrap());
    let ctx = ScanContext {
        repo: &fixture.repo,
        mapping: &mapping,
        exclusion: &exclusion,
        max_errors: 50,
    };

    let mut session = start_session(&fixture.base, "2025", 10).unwrap();
    let mut imported = 0;
    let mut skipped = 0;
    for chunk_index in 0..session.total_chunks() {
        let outcome = process_chunk(&ctx, &mut session, chunk_index).unwrap();
        imported += outcome.imported;
        skipped += outcome.skipped;
    }
    (imported, skipped)
}

#[test]
fn scan_derives_all_metadata_from_filename_and_folder() {
    let fixture = fixture();
    let (imported, _) = scan_all(&fixture);
    assert_eq!(imported, 1);

    let all = fixture.repo.get_all().unwrap();
    assert_eq!(all.len(), 1);
    let record = &all[0];
    assert_eq!(record.linie_neu, "100");
    assert_eq!(record.linie_alt, "5000");
    assert_eq!(record.titel, "Villach \u{2014} Klagenfurt");
    assert_eq!(record.gueltig_von.to_string(), "2024-12-14");
    assert_eq!(record.gueltig_bis.to_string(), "2025-12-13");
    assert_eq!(record.jahr, "2025");
    assert_eq!(record.region, "kaernten");
    assert_eq!(record.dateiname, "100-villach-klagenfurt.pdf");
    assert_eq!(record.pdf_pfad, "2025/kaernten/100-villach-klagenfurt.pdf");
}

#[test]
fn rescan_skips_publish_then_search_finds_by_either_number() {
    let fixture = fixture();
    scan_all(&fixture);

    // Re-scan: nothing new
    let (imported, skipped) = scan_all(&fixture);
    assert_eq!(imported, 0);
    assert_eq!(skipped, 1);

    fixture.repo.publish().unwrap();

    // Searching by the new number and by the legacy number (expanded through
    // the mapping, the way the search endpoint does it)
    let mapping = LineMapping::parse(&fixture.options.line_mapping().unwrap());
    for query in ["100", "5000"] {
        let mut line_terms = vec![query.to_string()];
        if let Some(old) = mapping.lookup(query) {
            line_terms.push(old.to_string());
        }
        if let Some(new) = mapping.lookup_old(query) {
            line_terms.push(new.to_string());
        }
        let hits = fixture.repo.search(None, query, &line_terms, 10).unwrap();
        assert_eq!(hits.len(), 1, "query {:?} should hit", query);
    }
}

#[test]
fn sync_and_delete_missing_reflect_the_filesystem() {
    let fixture = fixture();
    scan_all(&fixture);

    fs::remove_file(fixture.base.join("2025/kaernten/100-villach-klagenfurt.pdf")).unwrap();
    let outcome = fixture.repo.sync(&fixture.base).unwrap();
    assert_eq!(outcome.marked_missing, 1);

    assert_eq!(fixture.repo.delete_missing().unwrap(), 1);
    assert!(fixture.repo.get_all().unwrap().is_empty());
}
