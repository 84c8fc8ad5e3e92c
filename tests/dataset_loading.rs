use std::path::Path;

use genomedag::dataset::{
    chromosome_id, discover_populations, load_datasets, parse_datasets, ChromosomeDataset,
    Population,
};
use genomedag::errors::GenomeDagError;
use genomedag::fs::mock::MockFileSystem;
use genomedag::fs::RealFileSystem;

#[test]
fn test_chromosome_id_extraction() {
    assert_eq!(chromosome_id("ALL.chr1.250000.vcf").unwrap(), "1");
    assert_eq!(chromosome_id("ALL.chrX.vcf").unwrap(), "X");
    assert_eq!(chromosome_id("data/ALL.chr22.phase3.vcf").unwrap(), "22");
    assert!(matches!(
        chromosome_id("ALL.vcf"),
        Err(GenomeDagError::DatasetError(_))
    ));
    assert!(chromosome_id("ALL.chr.vcf").is_err());
}

#[test]
fn test_parse_rows_with_whitespace_and_blank_lines() {
    let csv = "ALL.chr1.250000.vcf, 250000, SIFT.chr1.txt\n\nALL.chrX.vcf,10,SIFT.chrX.txt\n";
    let rows = parse_datasets(csv.as_bytes()).unwrap();

    assert_eq!(
        rows,
        vec![
            ChromosomeDataset {
                base_file: "ALL.chr1.250000.vcf".into(),
                threshold: 250_000,
                sifting_file: "SIFT.chr1.txt".into(),
                chromosome: "1".into(),
            },
            ChromosomeDataset {
                base_file: "ALL.chrX.vcf".into(),
                threshold: 10,
                sifting_file: "SIFT.chrX.txt".into(),
                chromosome: "X".into(),
            },
        ]
    );
}

#[test]
fn test_parse_rejects_malformed_rows() {
    let cases = [
        "ALL.chr1.vcf,abc,SIFT.chr1.txt\n",
        "ALL.chr1.vcf,10\n",
        "ALL.chr1.vcf,0,SIFT.chr1.txt\n",
        "ALL.chr1.vcf,-3,SIFT.chr1.txt\n",
        "ALL.vcf,10,SIFT.txt\n",
        "ALL.chr1.vcf,10,\n",
    ];
    for case in cases {
        let err = parse_datasets(case.as_bytes()).unwrap_err();
        assert!(
            matches!(err, GenomeDagError::DatasetError(_)),
            "{case:?} gave {err:?}"
        );
    }
}

#[test]
fn test_load_datasets_through_mock_fs() {
    let fs = MockFileSystem::new();
    fs.add_file("cfg/data.csv", "ALL.chr2.20.vcf,20,SIFT.chr2.txt\n");

    let rows = load_datasets(&fs, Path::new("cfg/data.csv")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].chromosome, "2");
    assert_eq!(rows[0].threshold, 20);
}

#[test]
fn test_missing_dataset_description_is_reported() {
    let fs = MockFileSystem::new();
    let err = load_datasets(&fs, Path::new("nope.csv")).unwrap_err();
    assert!(matches!(err, GenomeDagError::DatasetError(_)), "got {err:?}");
}

#[test]
fn test_populations_are_sorted_files_without_hidden_entries() {
    let fs = MockFileSystem::new();
    fs.add_file("pops/EUR", "HG00096\n");
    fs.add_file("pops/AFR", "HG01879\n");
    fs.add_file("pops/.DS_Store", "");
    fs.add_dir("pops/archive");

    let pops = discover_populations(&fs, Path::new("pops")).unwrap();
    assert_eq!(pops, vec![Population::new("AFR"), Population::new("EUR")]);
}

#[test]
fn test_empty_population_directory_is_not_an_error() {
    let fs = MockFileSystem::new();
    fs.add_dir("pops");
    assert!(discover_populations(&fs, Path::new("pops")).unwrap().is_empty());

    assert!(discover_populations(&fs, Path::new("missing")).is_err());
}

#[test]
fn test_real_fs_loading() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data.csv");
    std::fs::write(&data, "ALL.chr3.6.vcf,6,SIFT.chr3.txt\n").unwrap();
    let pops = tmp.path().join("populations");
    std::fs::create_dir(&pops).unwrap();
    std::fs::write(pops.join("GBR"), "").unwrap();
    std::fs::write(pops.join("ALL"), "").unwrap();

    let rows = load_datasets(&RealFileSystem, &data).unwrap();
    assert_eq!(rows[0].chromosome, "3");

    let found = discover_populations(&RealFileSystem, &pops).unwrap();
    let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["ALL", "GBR"]);
}
