#![no_main]

use libfuzzer_sys::fuzz_target;
use ufotofu::producer::{MapItem, TestProducerBuilder};
use ufotofu_conduit::prelude::*;
use ufotofu_conduit::stage::map;

fn f(x: u16) -> u32 {
    (x as u32).wrapping_mul(31) ^ 0xf00d
}

fuzz_target!(|data: (Box<[u16]>, Result<(), u16>, Box<[bool]>)| {
    pollster::block_on(async {
        let (items, last, yield_pattern) = data;

        let via_conduit = TestProducerBuilder::new(items.clone(), last)
            .yield_pattern(yield_pattern)
            .build();
        let via_map = TestProducerBuilder::new(items, last).build();

        let conduit = as_conduit(|input: Awaited<u16, u16>| MapItem::new(input, f));
        let mut out_conduit = as_stream(conduit, via_conduit);
        let mut out_map = as_stream(map(f), via_map);

        loop {
            let from_conduit = out_conduit.produce().await;
            let from_map = out_map.produce().await;
            assert_eq!(from_conduit, from_map);

            if !matches!(from_conduit, Ok(Left(_))) {
                break;
            }
        }
    });
});
