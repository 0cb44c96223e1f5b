//! Solidity bindings of the account and of the contracts it talks to.

use alloy_sol_types::sol;
use serde::{Deserialize, Serialize};

sol! {
    /// A patch instruction: copy `sourceReturnLength` bytes starting at `sourceReturnOffset` of
    /// the result of call `sourceCallIndex` over the input of the current call at
    /// `targetCalldataOffset`.
    #[derive(Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct Injection {
        uint16 sourceCallIndex;
        uint16 sourceReturnOffset;
        uint16 sourceReturnLength;
        uint16 targetCalldataOffset;
    }

    /// One step of a pipeline.
    #[derive(Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct Call {
        address target;
        uint256 value;
        bytes callData;
        Injection[] injections;
    }

    /// The ERC-4337 v0.7 packed user operation.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct PackedUserOperation {
        address sender;
        uint256 nonce;
        bytes initCode;
        bytes callData;
        bytes32 accountGasLimits;
        uint256 preVerificationGas;
        bytes32 gasFees;
        bytes paymasterAndData;
        bytes signature;
    }

    /// The external surface of the chained account.
    interface IChainedAccount {
        event OwnerChanged(address indexed previousOwner, address indexed newOwner);
        event ChainExecuted(uint256 callCount, bytes32 sessionId);

        error Unauthorized();
        error CallFailed(uint256 index, bytes reason);
        error InvalidSignature();
        error InvalidNonce();
        error TransferFailed(bytes reason);

        function execute(address target, uint256 value, bytes calldata data) external payable returns (bytes memory result);
        function execute(Call[] calldata calls) external payable returns (bytes[] memory results);
        function executeSigned(Call[] calldata calls, uint256 nonce, uint256 deadline, bytes calldata signature) external payable returns (bytes[] memory results);
        function validateUserOp(PackedUserOperation calldata userOp, bytes32 userOpHash, uint256 missingAccountFunds) external returns (uint256 validationData);
        function setOwner(address newOwner) external;
        function withdrawETH(address to, uint256 amount) external;
        function withdrawToken(address token, address to, uint256 amount) external;
        function owner() external view returns (address);
        function entryPoint() external view returns (address);
        function nonce() external view returns (uint256);
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }

    /// The account-abstraction account interface.
    interface IAccount {
        function validateUserOp(PackedUserOperation calldata userOp, bytes32 userOpHash, uint256 missingAccountFunds) external returns (uint256 validationData);
    }

    /// ERC-165 interface detection.
    interface IERC165 {
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }

    /// ERC-1271 delegated signature validity query.
    interface IERC1271 {
        function isValidSignature(bytes32 hash, bytes calldata signature) external view returns (bytes4 magicValue);
    }

    /// The part of ERC-20 the account uses to move token balances out.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address owner) external view returns (uint256);
    }
}

impl Call {
    /// Creates a call without injection rules.
    pub fn new(
        target: alloy_primitives::Address,
        value: alloy_primitives::U256,
        call_data: impl Into<alloy_primitives::Bytes>,
    ) -> Self {
        Self { target, value, callData: call_data.into(), injections: Vec::new() }
    }

    /// Appends an injection rule to the call.
    pub fn with_injection(mut self, injection: Injection) -> Self {
        self.injections.push(injection);
        self
    }
}

impl Injection {
    /// Creates an injection rule.
    pub const fn new(
        source_call_index: u16,
        source_return_offset: u16,
        source_return_length: u16,
        target_calldata_offset: u16,
    ) -> Self {
        Self {
            sourceCallIndex: source_call_index,
            sourceReturnOffset: source_return_offset,
            sourceReturnLength: source_return_length,
            targetCalldataOffset: target_calldata_offset,
        }
    }
}
