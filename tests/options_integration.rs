use anyhow::Result;
use typed_options::{
    BaseOption, BufferSink, Location, OptionGroup, Options, OptionsNameExtractor, OptionsRegistry,
    TypedOption,
};

/// Live configuration consumers read; filled through bound locations by the
/// canonical feed pass.
struct CacheConfig {
    size_mb: Location<u64>,
    mode: Location<String>,
    readonly: Location<bool>,
}

impl CacheConfig {
    fn new() -> Self {
        Self {
            size_mb: Location::new(0),
            mode: Location::new(String::new()),
            readonly: Location::new(false),
        }
    }
}

/// One declaration path drives every backend: the registry performs the
/// real feed, the name extractor records only group identity.
fn declare_cache_stack(config: &CacheConfig, backend: &mut dyn Options) -> Result<()> {
    backend.register_group(
        OptionGroup::new("Cache Options")
            .add(
                TypedOption::<u64>::new("cache_size_mb")
                    .help("In-memory cache budget in mebibytes")
                    .default_value(64)
                    .bind(&config.size_mb),
            )
            .add(
                TypedOption::<String>::new("cache_mode")
                    .help("Eviction strategy")
                    .default_value("lru".to_string())
                    .one_of(["lru".to_string(), "lfu".to_string(), "arc".to_string()])
                    .bind(&config.mode),
            )
            .add(
                TypedOption::<bool>::new("cache_readonly")
                    .short_name("r")
                    .bind(&config.readonly),
            ),
    )?;
    backend.register_group(
        OptionGroup::new("Logging Options")
            .add(TypedOption::<bool>::new("quiet").short_name("q")),
    )?;
    Ok(())
}

#[test]
fn test_full_feed_pass_fills_bound_locations() {
    let config = CacheConfig::new();
    let mut registry = OptionsRegistry::new();
    registry.insert("cache_size_mb", "256");
    registry.insert("cache_mode", "lfu");
    registry.insert("r", "");

    declare_cache_stack(&config, &mut registry).unwrap();

    assert_eq!(config.size_mb.get(), 256);
    assert_eq!(config.mode.get(), "lfu");
    assert!(config.readonly.get());

    assert!(registry.was_supplied("cache_size_mb"));
    assert!(registry.was_supplied("cache_readonly"));
    assert!(!registry.was_supplied("quiet"));
}

#[test]
fn test_defaults_flow_through_when_nothing_is_supplied() {
    let config = CacheConfig::new();
    let mut registry = OptionsRegistry::new();

    declare_cache_stack(&config, &mut registry).unwrap();

    assert_eq!(config.size_mb.get(), 64);
    assert_eq!(config.mode.get(), "lru");
    assert!(registry.supplied_option_names().is_empty());
}

#[test]
fn test_out_of_set_value_is_kept_and_flagged() {
    let config = CacheConfig::new();
    let mut registry = OptionsRegistry::new();
    registry.insert("cache_mode", "random");

    declare_cache_stack(&config, &mut registry).unwrap();

    let option = registry.get::<String>("cache_mode").unwrap();
    assert_eq!(option.get_value().unwrap(), "random");
    let violation = option.one_of_violation().unwrap();
    assert!(violation.contains("'random'"));
    assert!(violation.contains("--cache_mode"));
    assert!(violation.contains("lru, lfu, arc"));
}

#[test]
fn test_stale_names_surface_through_the_sink() {
    let config = CacheConfig::new();
    let mut registry = OptionsRegistry::new();
    registry.insert("cache_size", "256");

    declare_cache_stack(&config, &mut registry).unwrap();

    let mut sink = BufferSink::new();
    registry.check_unregistered(&mut sink);
    assert_eq!(sink.messages(), ["unrecognized option: --cache_size"]);
}

#[test]
fn test_extractor_derives_the_same_signature_from_the_same_declaration() {
    let config = CacheConfig::new();
    let mut extractor = OptionsNameExtractor::new();
    declare_cache_stack(&config, &mut extractor).unwrap();

    assert_eq!(extractor.generated_name(), "Cache Options, Logging Options");
    assert!(extractor.supplied_option_names().is_empty());

    // A second declaration pass in reverse group order changes nothing.
    let mut reversed = OptionsNameExtractor::new();
    reversed
        .register_group(OptionGroup::new("Logging Options"))
        .unwrap();
    reversed
        .register_group(OptionGroup::new("Cache Options"))
        .unwrap();
    assert_eq!(reversed.generated_name(), extractor.generated_name());
}
