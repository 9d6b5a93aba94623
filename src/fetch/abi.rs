//! Contract interfaces for the protocols the dashboard reads and drives.

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IPoolDirectory {
        struct Pool {
            string name;
            address creator;
            address comptroller;
            uint256 blockPosted;
            uint256 timestampPosted;
        }

        function getPublicPools() external view returns (uint256[] memory indexes, Pool[] memory pools);
        function deployPool(
            string memory name,
            address implementation,
            bool enforceWhitelist,
            uint256 closeFactor,
            uint256 liquidationIncentive,
            address priceOracle
        ) external returns (uint256, address);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IComptroller {
        function getAllMarkets() external view returns (address[] memory);
        function markets(address cToken) external view returns (bool isListed, uint256 collateralFactorMantissa);
        function oracle() external view returns (address);
        function enterMarkets(address[] memory cTokens) external returns (uint256[] memory);
        function exitMarket(address cToken) external returns (uint256);
        function checkMembership(address account, address cToken) external view returns (bool);
        function getRewardsDistributors() external view returns (address[] memory);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract ICToken {
        function underlying() external view returns (address);
        function supplyRatePerBlock() external view returns (uint256);
        function borrowRatePerBlock() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function exchangeRateStored() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function borrowBalanceStored(address account) external view returns (uint256);
        function mint(uint256 mintAmount) external returns (uint256);
        function redeemUnderlying(uint256 redeemAmount) external returns (uint256);
        function borrow(uint256 borrowAmount) external returns (uint256);
        function repayBorrow(uint256 repayAmount) external returns (uint256);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IRewardsDistributor {
        function rewardToken() external view returns (address);
        function compSupplySpeeds(address cToken) external view returns (uint256);
        function compBorrowSpeeds(address cToken) external view returns (uint256);
        function claimRewards(address holder) external;
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IFundManager {
        function balanceOf(address account) external view returns (uint256);
        function yieldRatePerSecond() external view returns (uint256);
        function deposit(string memory currencyCode, uint256 amount) external;
        function withdraw(string memory currencyCode, uint256 amount) external returns (bool);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract ITranchePool {
        function base_asset() external view returns (address);
        function current_epoch() external view returns (uint256);
        function SFI_ratio() external view returns (uint256);
        function add_liquidity(uint256 amount, uint8 tranche) external;
        function balanceOf(address who, uint8 tranche) external view returns (uint256);
    }
}
