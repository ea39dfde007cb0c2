mod module {
    use tether_binding::{
        BindingError, ClassBuilder, Module, ModuleSettings, Object, Value,
        demo::{self, BarHolder, FooHolder, Identified},
    };
    use tether_memory::IntrusivePtr;
    use tether_test_utils::{DropLog, Tracked};

    fn get_i64(module: &Module, object: &Object, name: &str) -> i64 {
        i64::try_from(module.get_attr(object, name).unwrap()).unwrap()
    }

    fn bar_count(object: &Object) -> usize {
        IntrusivePtr::ref_count(object.holder::<BarHolder>().unwrap())
    }

    fn tracked_module() -> Module {
        let module = Module::new("tracked");
        module
            .add_class(
                ClassBuilder::<IntrusivePtr<Tracked>>::new("Tracked")
                    .property_readonly("id", |tracked| tracked.id as i64),
            )
            .unwrap();
        module
    }

    mod classes {
        use super::*;

        #[test]
        fn demo_classes_are_registered() {
            let module = demo::make_module().unwrap();

            assert_eq!(module.name(), "demo");
            assert_eq!(module.class_names(), ["Foo", "Bar"]);
        }

        #[test]
        fn bar_is_an_instance_of_foo() {
            let module = demo::make_module().unwrap();
            let bar = module.construct("Bar", &[]).unwrap();
            let foo = module.construct("Foo", &[]).unwrap();

            assert_eq!(bar.class_name(), "Bar");
            assert!(bar.is_instance_of("Bar"));
            assert!(bar.is_instance_of("Foo"));
            assert!(foo.is_instance_of("Foo"));
            assert!(!foo.is_instance_of("Bar"));
        }

        #[test]
        fn classes_without_init_cant_be_constructed() {
            let module = tracked_module();

            assert_eq!(
                module.construct("Tracked", &[]).unwrap_err(),
                BindingError::NoConstructor("Tracked".into())
            );
        }

        #[test]
        fn base_holder_types_must_match() {
            let module = demo::make_module().unwrap();
            let class = ClassBuilder::<BarHolder>::new("Baz").base("Foo", BarHolder::clone);

            assert_eq!(
                module.add_class(class),
                Err(BindingError::HolderMismatch {
                    expected: std::any::type_name::<FooHolder>()
                })
            );
        }
    }

    mod lifetimes {
        use super::*;
        use test_case::test_case;

        #[test]
        fn constructed_objects_are_owned_by_the_runtime() {
            let module = demo::make_module().unwrap();

            let bar = module.construct("Bar", &[]).unwrap();
            assert_eq!(bar_count(&bar), 1);

            let copy = bar.clone();
            assert_eq!(bar_count(&bar), 2);
            assert_eq!(copy.address(), bar.address());

            drop(copy);
            assert_eq!(bar_count(&bar), 1);
        }

        #[test_case("construct"; "static function")]
        #[test_case("construct_raw"; "factory returning an address")]
        fn static_constructors_hand_over_one_reference(name: &str) {
            let module = demo::make_module().unwrap();

            let bar = module.call_static("Bar", name, &[]).unwrap();

            assert_eq!(bar.class_name(), "Bar");
            assert_eq!(bar_count(&bar), 1);
        }

        #[test]
        fn wrapping_an_address_retains() {
            let module = demo::make_module().unwrap();
            let native = demo::Bar::construct();

            let bar = unsafe {
                module
                    .wrap_raw::<BarHolder>("Bar", native.get().unwrap())
                    .unwrap()
            };
            assert_eq!(IntrusivePtr::ref_count(&native), 2);

            drop(bar);
            assert_eq!(IntrusivePtr::ref_count(&native), 1);
        }

        #[test]
        fn wrapping_a_holder_shares_it() {
            let module = demo::make_module().unwrap();
            let native = demo::Bar::construct();

            let bar = module.wrap_holder("Bar", native.clone()).unwrap();

            assert_eq!(IntrusivePtr::ref_count(&native), 2);
            assert_eq!(bar.address(), IntrusivePtr::address(&native));
        }

        #[test]
        fn adopting_an_address_takes_over_the_reference() {
            let log = DropLog::new();
            let module = tracked_module();
            let mut native = IntrusivePtr::new(Tracked::new(7, &log));

            let ptr = native.detach().unwrap();
            let object = unsafe {
                module
                    .adopt_raw::<IntrusivePtr<Tracked>>("Tracked", ptr)
                    .unwrap()
            };

            let holder = object.holder::<IntrusivePtr<Tracked>>().unwrap();
            assert_eq!(IntrusivePtr::ref_count(holder), 1);
            assert_eq!(get_i64(&module, &object, "id"), 7);

            drop(object);
            assert_eq!(log.ids(), [7]);
        }

        #[test]
        fn dropping_the_last_object_destroys_the_native_object() {
            let log = DropLog::new();
            let module = tracked_module();
            let native = IntrusivePtr::new(Tracked::new(1, &log));

            let object = module.wrap_holder("Tracked", native).unwrap();
            let copy = object.clone();

            drop(object);
            assert_eq!(log.count(), 0);
            drop(copy);
            assert_eq!(log.times_destroyed(1), 1);
        }

        #[test]
        fn holder_types_are_checked() {
            let module = demo::make_module().unwrap();
            let native = demo::Bar::construct();

            assert_eq!(
                module.wrap_holder("Foo", native.clone()).unwrap_err(),
                BindingError::HolderMismatch {
                    expected: std::any::type_name::<FooHolder>()
                }
            );
            assert_eq!(IntrusivePtr::ref_count(&native), 1);
        }

        #[test]
        fn empty_holders_are_rejected() {
            let module = demo::make_module().unwrap();

            assert_eq!(
                module.wrap_holder("Bar", BarHolder::null()).unwrap_err(),
                BindingError::NullHolder
            );
        }
    }

    mod attributes {
        use super::*;
        use test_case::test_case;

        #[test]
        fn foo_id() {
            let module = demo::make_module().unwrap();
            let foo = module.construct("Foo", &[42i64.into()]).unwrap();

            assert_eq!(get_i64(&module, &foo, "id"), 42);
            module.set_attr(&foo, "id", 99i64.into()).unwrap();
            assert_eq!(get_i64(&module, &foo, "id"), 99);
            assert_eq!(get_i64(&module, &foo, "ref_count"), 1);
        }

        #[test]
        fn base_attributes_refer_to_the_same_object() {
            let module = demo::make_module().unwrap();
            let bar = module.construct("Bar", &[]).unwrap();

            module.set_attr(&bar, "id", 7i64.into()).unwrap();

            assert_eq!(get_i64(&module, &bar, "id"), 7);
            let native = bar.holder::<BarHolder>().unwrap();
            assert_eq!(native.base().id(), 7);
            assert_eq!(bar_count(&bar), 1);
        }

        #[test]
        fn methods() {
            let module = demo::make_module().unwrap();
            let bar = module.construct("Bar", &[]).unwrap();
            module.set_attr(&bar, "id", 3i64.into()).unwrap();

            let description = module.call_method(&bar, "describe", &[]).unwrap();

            assert_eq!(String::try_from(description).unwrap(), "Bar(id: 3)");
        }

        #[test]
        fn read_only_attribute() {
            let module = demo::make_module().unwrap();
            let foo = module.construct("Foo", &[]).unwrap();

            assert_eq!(
                module.set_attr(&foo, "ref_count", 2i64.into()),
                Err(BindingError::ReadOnlyAttribute {
                    class: "Foo".into(),
                    name: "ref_count".into()
                })
            );
        }

        #[test]
        fn unexpected_value_type() {
            let module = demo::make_module().unwrap();
            let foo = module.construct("Foo", &[]).unwrap();

            assert_eq!(
                module.set_attr(&foo, "id", "nope".into()),
                Err(BindingError::UnexpectedType {
                    expected: "Number".into(),
                    found: "String".into()
                })
            );
        }

        #[test_case("Foo", &[Value::Null, Value::Null]; "too many Foo arguments")]
        #[test_case("Bar", &[Value::Null]; "Bar takes no arguments")]
        fn wrong_argument_count(class: &str, args: &[Value]) {
            let module = demo::make_module().unwrap();

            assert!(matches!(
                module.construct(class, args),
                Err(BindingError::WrongArgumentCount { .. })
            ));
        }

        #[test]
        fn unknown_names() {
            let module = demo::make_module().unwrap();
            let bar = module.construct("Bar", &[]).unwrap();

            assert_eq!(
                module.get_attr(&bar, "size").unwrap_err(),
                BindingError::UnknownAttribute {
                    class: "Bar".into(),
                    name: "size".into()
                }
            );
            assert_eq!(
                module.call_method(&bar, "explode", &[]).unwrap_err(),
                BindingError::UnknownMethod {
                    class: "Bar".into(),
                    name: "explode".into()
                }
            );
            assert_eq!(
                module.call_static("Bar", "explode", &[]).unwrap_err(),
                BindingError::UnknownStaticFunction {
                    class: "Bar".into(),
                    name: "explode".into()
                }
            );
        }

        #[test]
        fn dynamic_attributes() {
            let settings = ModuleSettings::default().with_dynamic_attributes();
            let module = demo::make_module_with_settings(settings).unwrap();
            let bar = module.construct("Bar", &[]).unwrap();
            let copy = bar.clone();

            module.set_attr(&bar, "name", "bar".into()).unwrap();

            let name = module.get_attr(&copy, "name").unwrap();
            assert_eq!(String::try_from(name).unwrap(), "bar");
            // Declared attributes still go to the native object
            module.set_attr(&bar, "id", 5i64.into()).unwrap();
            assert_eq!(bar.holder::<BarHolder>().unwrap().base().id(), 5);
        }

        #[test]
        fn dynamic_attributes_are_disabled_by_default() {
            let module = demo::make_module().unwrap();
            let bar = module.construct("Bar", &[]).unwrap();

            assert!(matches!(
                module.set_attr(&bar, "name", "bar".into()),
                Err(BindingError::UnknownAttribute { .. })
            ));
        }
    }
}
