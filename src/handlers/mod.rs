// Two security tiers:
//   public    - no authentication (/auth/*)
//   protected - bearer JWT required (/api/*)
pub mod protected;
pub mod public;
