use quote::{format_ident, quote};

/// Generates one `#[test]` per `.lox` file under `bin/tests/lox`. Each test
/// hands the file's contents to `lox_expect`, which must be in scope.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/../lox", env!("CARGO_MANIFEST_DIR"));
    let mut files = walkdir::WalkDir::new(&root_dir)
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .collect::<Vec<_>>();
    files.sort_by(|a, b| a.path().cmp(b.path()));

    let tests = files.iter().filter_map(|entry| {
        let test_file_path = entry.path().to_string_lossy();
        let relative_test_path = entry.path().strip_prefix(&root_dir).ok()?.to_string_lossy();
        let test_ident = format_ident!(
            "test_{}",
            relative_test_path.replace(['/', '-'], "_").replace(".lox", "")
        );
        Some(quote! {
            #[test]
            fn #test_ident() {
                lox_expect(&std::fs::read_to_string(#test_file_path).unwrap());
            }
        })
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            let _ = env_logger::builder().is_test(true).try_init();
        }

        #(#tests)*
    }
    .into()
}
