//! Basic usage example for backlog-wire
//!
//! Run with: cargo run --example basic_usage

use backlog_wire::*;

fn main() -> Result<()> {
    println!("Backlog Wire Basic Usage Example");
    println!("================================");

    // Example 1: control message without payload
    println!("\n1. Ping:");
    {
        let ping = Message::with_timestamp(registry::PING, 1_700_000_000_000);
        let bytes = ping.encode()?;
        println!("  Encoded {} bytes: {:02X?}", bytes.len(), bytes);

        let decoded = decode(bytes)?;
        println!(
            "  Decoded: type={} ({:?}), ts={}",
            decoded.msg_type(),
            decoded.type_name(),
            decoded.timestamp()
        );
    }

    // Example 2: plugin message with a mixed payload
    println!("\n2. GPS reading:");
    {
        let msg = Message::with_payload(
            registry::GPS,
            1_700_000_000_000,
            vec![
                PayloadValue::Int16(1),
                PayloadValue::Float64(46.5481),
                PayloadValue::Float64(7.9829),
                PayloadValue::Null, // altitude not available
                PayloadValue::from("3D"),
            ],
        )?;
        println!("  Estimated size: {} bytes", msg.size());

        let bytes = msg.encode()?;
        println!("  Encoded {} bytes", bytes.len());
        println!("  Cached size: {} bytes", msg.size());

        let decoded = decode(bytes)?;
        for (i, value) in decoded.payload().iter().enumerate() {
            println!("  [{}] {:?}", i, value);
        }
    }

    // Example 3: zero-allocation encoding into a caller buffer
    println!("\n3. Encoding into a fixed buffer:");
    {
        let msg = Message::with_payload(
            registry::BINARY,
            0,
            vec![PayloadValue::Int8(3), PayloadValue::ByteBlob(vec![0xCA, 0xFE])],
        )?;
        let mut buf = [0u8; 64];
        let size = msg.encode_into(&mut buf)?;
        println!("  Wrote {} bytes: {:02X?}", size, &buf[..size]);
    }

    // Example 4: error handling
    println!("\n4. Error handling:");
    {
        let oversize = vec![PayloadValue::ByteBlob(vec![0; MAX_PAYLOAD_SIZE])];
        match Message::with_payload(registry::BINARY, 0, oversize) {
            Err(e) => println!("  Oversize payload rejected: {}", e),
            Ok(_) => println!("  Unexpected success"),
        }

        let bad_bool = [30, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, b'?', 2];
        match decode(&bad_bool) {
            Err(e) => println!("  Bad boolean rejected: {}", e),
            Ok(_) => println!("  Unexpected success"),
        }

        match decode(&bad_bool[..12]) {
            Err(e) => println!("  Truncated message rejected: {}", e),
            Ok(_) => println!("  Unexpected success"),
        }
    }

    Ok(())
}
