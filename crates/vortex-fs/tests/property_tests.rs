use proptest::prelude::*;
use vortex_fs::checksum;
use vortex_fs::io;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_written_content_reads_back_and_matches_checksum(content in "\\PC*") {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prop.service");

        io::write_text(&path, &content).unwrap();

        prop_assert_eq!(io::read_text(&path).unwrap(), content.clone());
        prop_assert_eq!(
            checksum::file_checksum(&path).unwrap(),
            Some(checksum::content_checksum(content.as_bytes()))
        );
    }
}
