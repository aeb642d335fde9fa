use crate::*;
use std::sync::Arc;
use std::thread;

#[test]
fn test_pool_reuse() {
    let pool = BufferPool::new(16);
    assert_eq!(pool.idle(), 0);
    {
        let mut buf = pool.acquire();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 16);
        buf.extend_from_slice(&[b'x'; 100]);
    }
    assert_eq!(pool.idle(), 1);
    let buf = pool.acquire();
    assert_eq!(pool.idle(), 0);
    // reset on release, the capacity is kept
    assert!(buf.is_empty());
    assert!(buf.capacity() >= 100);
}

#[test]
fn test_pool_drop_oversized() {
    let pool = BufferPool::new(16);
    {
        let mut buf = pool.acquire();
        buf.resize(MAX_POOLED_CAP + 1, 0);
    }
    assert_eq!(pool.idle(), 0);
}

#[test]
fn test_pool_concurrent() {
    let pool = Arc::new(BufferPool::new(DEFAULT_BUFFER_CAP));
    let mut ths = Vec::new();
    for i in 0..8u8 {
        let pool = pool.clone();
        ths.push(thread::spawn(move || {
            for _ in 0..1000 {
                let mut buf = pool.acquire();
                assert!(buf.is_empty());
                buf.push(i);
                assert_eq!(buf.as_slice(), &[i]);
            }
        }));
    }
    for th in ths {
        th.join().unwrap();
    }
    assert!(pool.idle() <= 8);
}
