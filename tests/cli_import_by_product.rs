//! Integration tests for the by-product import strategy
//!
//! Layout under test: `<store>/<Root>/PackageNN/<product>/<group>/<asset>`
//! with independent copies per product and 500 products per package.

mod common;

use common::*;

#[test]
fn products_get_isolated_copies() {
    let env = TestEnv::new();
    env.write_asset("Small", "logo.png", "bytes");
    env.write_catalog(&["P-1", "P-2"]);
    env.write_mapping("asset,sku\nlogo.png,P-1\nlogo.png,P-2\n");

    let result = env.run_import(&[]);

    assert!(result.success, "import failed:\n{}", result.combined_output());
    assert!(env
        .store_file("Catalogs/Package00/P-1/Small/logo.png")
        .is_file());
    assert!(env
        .store_file("Catalogs/Package00/P-2/Small/logo.png")
        .is_file());
    assert_eq!(env.read_associations().len(), 2);
}

#[test]
fn skipped_product_leaves_no_folder_structure() {
    let env = TestEnv::new();
    env.write_asset("Small", "logo.png", "bytes");
    env.write_catalog(&[]);
    env.write_mapping("asset,sku\nlogo.png,P-404\n");

    let result = env.run_import(&[]);

    assert!(result.success, "import failed:\n{}", result.combined_output());
    assert!(result.stdout.contains("skipping 'P-404'"));
    assert!(!env.store_file("Catalogs/Package00").exists());
    assert!(env.read_associations().is_empty());
}

#[test]
fn existing_root_is_reused_case_insensitively() {
    let env = TestEnv::new();
    env.write_asset("Small", "logo.png", "bytes");
    env.write_catalog(&["P-1"]);
    env.write_mapping("asset,sku\nlogo.png,P-1\n");
    std::fs::create_dir(env.store_file("catalogs")).unwrap();

    let result = env.run_import(&["--root", "Catalogs"]);

    assert!(result.success, "import failed:\n{}", result.combined_output());
    assert!(env
        .store_file("catalogs/Package00/P-1/Small/logo.png")
        .is_file());
    assert!(!env.store_file("Catalogs").exists());
}

#[test]
fn packages_roll_over_after_500_products() {
    let env = TestEnv::new();
    env.write_asset("Small", "logo.png", "bytes");

    let codes: Vec<String> = (0..501).map(|i| format!("P-{i:04}")).collect();
    let code_refs: Vec<&str> = codes.iter().map(String::as_str).collect();
    env.write_catalog(&code_refs);

    let mut mapping = String::from("asset,sku\n");
    for code in &codes {
        mapping.push_str(&format!("logo.png,{code}\n"));
    }
    env.write_mapping(&mapping);

    let result = env.run_import(&[]);

    assert!(result.success, "import failed:\n{}", result.combined_output());
    assert!(env
        .store_file("Catalogs/Package00/P-0499/Small/logo.png")
        .is_file());
    assert!(env
        .store_file("Catalogs/Package01/P-0500/Small/logo.png")
        .is_file());
    assert!(!env.store_file("Catalogs/Package02").exists());
}

#[test]
fn import_twice_is_idempotent() {
    let env = TestEnv::new();
    env.write_asset("Small", "logo.png", "bytes");
    env.write_asset("Large", "logo.png", "bytes large");
    env.write_catalog(&["P-1"]);
    env.write_mapping("asset,sku\nlogo.png,P-1\n");

    let first = env.run_import(&[]);
    assert!(first.success, "first run failed:\n{}", first.combined_output());

    let second = env.run_import(&[]);
    assert!(
        second.success,
        "second run failed:\n{}",
        second.combined_output()
    );
    assert_eq!(env.read_associations().len(), 2);
}

#[test]
fn strategy_and_root_come_from_config_when_flags_are_absent() {
    let env = TestEnv::new();
    env.write_asset("Small", "logo.png", "bytes");
    env.write_catalog(&["P-1"]);
    env.write_mapping("asset,sku\nlogo.png,P-1\n");
    env.write_config("[import]\nroot = \"Media\"\nstrategy = \"by-asset\"\n");

    let result = env.run_import(&[]);

    assert!(result.success, "import failed:\n{}", result.combined_output());
    // by-asset layout under the configured root
    assert!(env.store_file("Media/Small/logo.png").is_file());
}

#[test]
fn unknown_config_key_warns_but_import_succeeds() {
    let env = TestEnv::new();
    env.write_asset("Small", "logo.png", "bytes");
    env.write_catalog(&["P-1"]);
    env.write_mapping("asset,sku\nlogo.png,P-1\n");
    env.write_config("[import]\nstratgy = \"by-asset\"\n");

    let result = env.run_import(&[]);

    assert!(result.success, "import failed:\n{}", result.combined_output());
    assert!(result.stderr.contains("unknown config key 'import.stratgy'"));
    // misspelled key is ignored, default strategy applies
    assert!(env
        .store_file("Catalogs/Package00/P-1/Small/logo.png")
        .is_file());
}

#[test]
fn conflicting_existing_asset_aborts_the_run() {
    let env = TestEnv::new();
    env.write_asset("Small", "logo.png", "new bytes");
    env.write_catalog(&["P-1"]);
    env.write_mapping("asset,sku\nlogo.png,P-1\n");

    let dest = env.store_file("Catalogs/Package00/P-1/Small");
    std::fs::create_dir_all(&dest).unwrap();
    std::fs::write(dest.join("logo.png"), "old bytes").unwrap();

    let result = env.run_import(&[]);

    assert!(!result.success, "expected failure:\n{}", result.combined_output());
    assert!(
        result.stderr.contains("different content"),
        "expected conflict error in:\n{}",
        result.stderr
    );
}
