use crate::common::virtual_network::VirtualSystem;

/// 0 - 1 - 2 with a long shortcut 0 - 2
pub fn vnet_triangle() -> VirtualSystem {
    VirtualSystem::create(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 5)])
}

pub fn vnet_simple_weighted() -> VirtualSystem {
    VirtualSystem::create(
        5,
        &[
            (0, 1, 2),
            (0, 2, 1),
            (1, 2, 4),
            (1, 3, 5),
            (2, 3, 100),
            (2, 4, 8),
            (3, 4, 1),
        ],
    )
}

/// a chain of `n` nodes where every hop costs 1
pub fn vnet_chain(n: usize) -> VirtualSystem {
    let links: Vec<_> = (1..n).map(|i| (i - 1, i, 1)).collect();
    VirtualSystem::create(n, &links)
}

/// two components {0, 1} and {2, 3} with no link between them
pub fn vnet_split() -> VirtualSystem {
    VirtualSystem::create(4, &[(0, 1, 3), (2, 3, 4)])
}
