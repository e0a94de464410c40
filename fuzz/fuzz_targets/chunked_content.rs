#![no_main]

use libfuzzer_sys::fuzz_target;
use ufotofu::producer::TestProducer;
use ufotofu_conduit::prelude::*;

fuzz_target!(|data: (TestProducer<u8, (), u8>, Box<[usize]>)| {
    pollster::block_on(async {
        let (pro, consume_amounts) = data;

        let items = pro.remaining().to_vec();
        let last = *pro.peek_last().unwrap();

        let mut rechunked = to_bstream(from_bstream(pro));
        let mut content = Vec::new();
        let mut round = 0;

        let outcome = loop {
            match rechunked.expose_items().await {
                Ok(Left(exposed)) => {
                    assert!(!exposed.is_empty());

                    let amount = match consume_amounts.get(round) {
                        Some(amount) => 1 + amount % exposed.len(),
                        None => exposed.len(),
                    };
                    round += 1;

                    content.extend_from_slice(&exposed[..amount]);
                    rechunked.consider_produced(amount).await.unwrap();
                }
                Ok(Right(())) => break Ok(()),
                Err(err) => break Err(err),
            }
        };

        assert_eq!(outcome, last);
        assert_eq!(content, items);
    });
});
