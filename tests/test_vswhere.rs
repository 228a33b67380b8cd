use devenv::{DevEnvInstallation, VsWhere};

#[ignore]
#[test]
fn test_find_vswhere() {
    // Cannot run the tests unless vswhere has
    // been installed into the test environment.

    assert!(VsWhere::find_vswhere().is_ok());
}

#[ignore]
#[test]
fn test_run() {
    // Cannot run the tests unless vswhere has
    // been installed into the test environment.

    let vs_where: VsWhere =
        VsWhere::find_vswhere().expect("vswhere should have been found if it was installed.");

    let args: [&str; 4] = ["-format", "json", "-products", "*"];
    let result = vs_where
        .run(Some(args.as_slice()))
        .expect("Calling vswhere with valid args should not return an error.");

    assert!(
        !result.is_empty(),
        "The returned string from calling vswhere was empty."
    );
}

#[ignore]
#[test]
fn test_detect() {
    // This will only work if any edition of Visual Studio 2022
    // is installed in the CI environment.

    let installation = DevEnvInstallation::detect("VS2022", Some("2022"))
        .expect("A 2022 installation should be detected.");
    assert_eq!(installation.name(), "VS2022");
    assert!(installation.home().ends_with("devenv.com"));
    assert!(std::path::Path::new(installation.home()).is_file());
}
