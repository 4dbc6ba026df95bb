use std::sync::Arc;

use enum_wire::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, WireEnum)]
#[repr(u8)]
#[wire(naming = "kebab_lower")]
enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    #[wire(alias = "Sat")]
    Saturday,
    Sunday,
}

const ALL: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

fn expected(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "monday",
        Weekday::Tuesday => "tuesday",
        Weekday::Wednesday => "wednesday",
        Weekday::Thursday => "thursday",
        Weekday::Friday => "friday",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "sunday",
    }
}

#[test]
fn racing_first_use_sees_one_slot() {
    let registry = CodecRegistry::new();
    let slots: Vec<Arc<TypeSlot>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(|| registry.slot::<Weekday>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(slots.iter().all(|slot| Arc::ptr_eq(slot, &slots[0])));
    assert_eq!(registry.len(), 1);
}

#[test]
fn results_are_stable_under_contention() {
    // Limit below the variant count so some lookups always recompute
    let registry = CodecRegistry::with_cache_limit(3);

    std::thread::scope(|s| {
        for offset in 0..8 {
            let registry = &registry;
            s.spawn(move || {
                for round in 0..200 {
                    let day = ALL[(offset + round) % ALL.len()];
                    let token = registry.encode(&day).unwrap();
                    assert_eq!(token, WireToken::from(expected(day)));
                    assert_eq!(registry.decode::<Weekday>(&token).unwrap(), day);
                }
            });
        }
    });

    let codec = registry.codec::<Weekday>().unwrap();
    assert_eq!(codec.cache().names().len(), 3);
    assert!(codec.cache().names().is_saturated());
}
