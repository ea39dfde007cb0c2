mod logging {
    use tether_binding::{ModuleSettings, demo};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn lifetime_logging_doesnt_affect_ownership() {
        init_logger();

        let settings = ModuleSettings::default().with_lifetime_logging();
        let module = demo::make_module_with_settings(settings).unwrap();
        assert!(module.settings().log_lifetimes);

        let bar = module.call_static("Bar", "construct_raw", &[]).unwrap();
        let copy = bar.clone();
        module.set_attr(&copy, "id", 11i64.into()).unwrap();
        drop(bar);

        let id = module.get_attr(&copy, "id").unwrap();
        assert_eq!(i64::try_from(id), Ok(11));
    }
}
