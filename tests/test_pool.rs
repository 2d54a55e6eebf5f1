use dino_stopper::effects::{Effect, EffectKind};
use dino_stopper::entities::{Creature, CreatureKind, Vec2};
use dino_stopper::pool::EntityPool;

#[test]
fn prewarmed_pool_starts_inactive() {
    let pool: EntityPool<Creature> = EntityPool::new(15);
    assert_eq!(pool.capacity(), 15);
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.iter().count(), 0);
}

#[test]
fn fresh_pool_hands_out_slots_in_order() {
    let mut pool: EntityPool<Creature> = EntityPool::new(4);
    let indices: Vec<usize> = (0..4).map(|_| pool.acquire().index()).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    assert_eq!(pool.active_count(), 4);
}

#[test]
fn exhausted_pool_grows_and_never_shrinks() {
    let mut pool: EntityPool<Creature> = EntityPool::new(2);
    let handles: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
    assert_eq!(pool.capacity(), 5);
    assert_eq!(pool.active_count(), 5);

    for h in handles {
        pool.release(h);
    }
    assert_eq!(pool.capacity(), 5);
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn release_then_acquire_gives_default_entity() {
    let mut pool: EntityPool<Creature> = EntityPool::new(3);
    let h = pool.acquire();
    {
        let c = pool.get_mut(h).unwrap();
        c.kind = CreatureKind::Alanqa;
        c.position = Vec2::new(321.0, 123.0);
        c.direction = -1;
        c.hurt = true;
        c.flip_x = true;
        c.scale = 2.0;
    }
    assert!(pool.release(h));

    let h2 = pool.acquire();
    assert_eq!(h2.index(), h.index());
    assert_eq!(pool.get(h2), Some(&Creature::default()));
}

#[test]
fn double_release_is_a_no_op() {
    let mut pool: EntityPool<Creature> = EntityPool::new(3);
    let a = pool.acquire();
    let _b = pool.acquire();
    assert!(pool.release(a));
    assert!(!pool.release(a));
    assert_eq!(pool.active_count(), 1);

    // The slot must only be handed out once.
    let c = pool.acquire();
    let d = pool.acquire();
    assert_ne!(c.index(), d.index());
    assert_eq!(pool.active_count(), 3);
}

#[test]
fn stale_handle_does_not_touch_reused_slot() {
    let mut pool: EntityPool<Creature> = EntityPool::new(1);
    let old = pool.acquire();
    pool.release(old);
    let new = pool.acquire();
    assert_eq!(old.index(), new.index());

    assert!(pool.get(old).is_none());
    assert!(!pool.release(old));
    assert!(pool.is_active(new));
    assert_eq!(pool.active_count(), 1);
}

#[test]
fn iteration_is_in_slot_order_and_skips_inactive() {
    let mut pool: EntityPool<Effect> = EntityPool::new(4);
    let hs: Vec<_> = (0..4).map(|_| pool.acquire()).collect();
    for (i, h) in hs.iter().enumerate() {
        pool.get_mut(*h).unwrap().started_at_ms = i as u64;
    }
    pool.release(hs[1]);

    let seen: Vec<u64> = pool.iter().map(|(_, e)| e.started_at_ms).collect();
    assert_eq!(seen, vec![0, 2, 3]);
}

#[test]
fn release_all_empties_pool() {
    let mut pool: EntityPool<Effect> = EntityPool::new(2);
    for _ in 0..3 {
        let h = pool.acquire();
        pool.get_mut(h).unwrap().kind = EffectKind::Celebration;
    }
    pool.release_all();
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.capacity(), 3);

    let h = pool.acquire();
    assert_eq!(pool.get(h).unwrap().kind, EffectKind::Explosion);
}
